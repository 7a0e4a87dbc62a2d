// Exported structs and types
pub use self::connect::{test_redis_connection, DBError, RedisStore};
pub use self::manager::CrudError;

// Submodules
mod account;
mod connect;
mod license;
mod manager;
