// Exported functions
pub use self::account::{action_balance, action_set, action_set_user};
pub use self::deposit::action_deposit;
pub use self::general::{action_help, action_maintenance, action_unimplemented};

// Exported constants
pub use self::constants::MAINTENANCE_MESSAGE;

// Submodules
mod account;
mod constants;
mod deposit;
mod general;
mod utils;
