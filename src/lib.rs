pub mod bot;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod license;
pub mod routes;
pub mod server;
pub mod supervisor;
