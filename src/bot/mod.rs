// bot/mod.rs

// Exported functions
pub use self::dispatcher::{build_dispatcher, handle_message};
pub use self::redis::test_redis_connection;

// Exported structs and types
pub use self::dispatcher::{BotContext, BotError, BotSettings, HandlerResult};
pub use self::message::{ChatMessage, Embed, Notifier};
pub use self::redis::{CrudError, RedisStore};
pub use self::store::{Account, AccountStore, License, LicenseStore};

// Declare submodules
mod command;
mod deposit;
mod dispatcher;
mod handler;
mod message;
mod processor;
mod redis;
mod store;

#[cfg(test)]
pub(crate) use self::store::memory;
