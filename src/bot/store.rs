use std::future::Future;

use super::redis::CrudError;

/* Store is the seam between the processor and the database.
 * The processor only ever talks to an AccountStore, so the rules around
 * names and balances can be exercised without a running Redis.
 */

#[derive(Debug, PartialEq, Clone)]
pub struct Account {
    pub user: String,
    pub name: String,
    pub balance: i64,
    pub balance_history: i64,
    pub sawer: i64,
}

impl Account {
    pub fn new(user: &str, name: &str) -> Self {
        Account {
            user: user.to_string(),
            name: name.to_string(),
            balance: 0,
            balance_history: 0,
            sawer: 0,
        }
    }
}

// Result of trying to claim a display name for a user.
#[derive(Debug, PartialEq, Clone)]
pub enum NameClaim {
    Created(Account),
    Renamed(Account),
    Taken,
}

// Which counter a deposit goes into.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CreditField {
    // Main balance, also added to the historical deposit total.
    Balance,
    // Saweria top-up counter.
    Sawer,
}

pub trait AccountStore: Sync {
    fn find_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Option<Account>, CrudError>> + Send;

    // Claims `name` for `user_id`. Fails with Taken if any account already uses it,
    // compared case-insensitively.
    fn claim_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<NameClaim, CrudError>> + Send;

    // Atomically adds `amount` to the given field of the account named `name`.
    // Returns the updated account, or None if no account has that name.
    fn credit(
        &self,
        name: &str,
        field: CreditField,
        amount: i64,
    ) -> impl Future<Output = Result<Option<Account>, CrudError>> + Send;
}

#[derive(Debug, PartialEq, Clone)]
pub struct License {
    pub active: bool,
    pub hwid: String,
}

#[allow(async_fn_in_trait)]
pub trait LicenseStore {
    async fn find_license(&self, license_key: &str) -> Result<Option<License>, CrudError>;
}
