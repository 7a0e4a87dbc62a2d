use super::{
    deposit::DepositNotice,
    redis::CrudError,
    store::{Account, AccountStore, CreditField, NameClaim},
};

/* Processor is the overall logic center of the bot.
 * It handles the main logic, communicating with the front-facing handler
 * and the back-facing account store.
 * It defines and executes the main functions required of the bot,
 * and handles exceptions and errors in the back.
 */

#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("{0}")]
    CrudError(CrudError),
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Deposit amount is out of range")]
    AmountOutOfRange,
}

// Implement the From trait to convert from CrudError to ProcessError
impl From<CrudError> for ProcessError {
    fn from(crud_error: CrudError) -> ProcessError {
        ProcessError::CrudError(crud_error)
    }
}

/* Registers a GrowID for a user.
 * Creates the account on first registration, renames it afterwards.
 * A name already in use by anyone, in any case, is refused.
 */
pub async fn register_name<S: AccountStore>(
    store: &S,
    user_id: &str,
    name: &str,
) -> Result<NameClaim, ProcessError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ProcessError::EmptyName);
    }

    Ok(store.claim_name(user_id, name).await?)
}

/* Retrieves the account of a user, if registered.
 */
pub async fn retrieve_account<S: AccountStore>(
    store: &S,
    user_id: &str,
) -> Result<Option<Account>, ProcessError> {
    Ok(store.find_by_user(user_id).await?)
}

/* Credits a deposit notice to the matching account.
 * Lock deposits go to the balance in World Locks, Saweria top-ups go to the
 * separate Rupiah counter. Returns None if no account has the name;
 * nothing is created in that case. An amount too large to convert into
 * World Locks is refused before the store is touched.
 */
pub async fn credit_deposit<S: AccountStore>(
    store: &S,
    notice: &DepositNotice,
) -> Result<Option<Account>, ProcessError> {
    let (field, amount) = match notice {
        DepositNotice::Lock { amount, unit, .. } => {
            let world_locks = unit
                .to_world_locks(*amount)
                .ok_or(ProcessError::AmountOutOfRange)?;
            (CreditField::Balance, world_locks)
        }
        DepositNotice::Saweria { amount, .. } => (CreditField::Sawer, *amount),
    };

    Ok(store.credit(notice.name(), field, amount).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::deposit::LockUnit;
    use crate::bot::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_register_then_rename() {
        let store = MemoryStore::new();
        let claim = register_name(&store, "1", "Alice").await.unwrap();
        assert_eq!(claim, NameClaim::Created(Account::new("1", "Alice")));

        let claim = register_name(&store, "1", "Alicia").await.unwrap();
        assert!(matches!(claim, NameClaim::Renamed(account) if account.name == "Alicia"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_register_is_case_insensitive() {
        let store = MemoryStore::new();
        register_name(&store, "1", "Alice").await.unwrap();

        let claim = register_name(&store, "2", "alice").await.unwrap();
        assert_eq!(claim, NameClaim::Taken);
        assert_eq!(retrieve_account(&store, "2").await.unwrap(), None);
        assert_eq!(
            retrieve_account(&store, "1").await.unwrap().unwrap().name,
            "Alice"
        );
    }

    #[tokio::test]
    async fn test_register_empty_name() {
        let store = MemoryStore::new();
        assert!(matches!(
            register_name(&store, "1", "  ").await,
            Err(ProcessError::EmptyName)
        ));
    }

    #[tokio::test]
    async fn test_credit_diamond_locks() {
        let store = MemoryStore::new();
        store.insert(Account::new("7", "Bob"));

        let notice = DepositNotice::Lock {
            name: "bob".to_string(),
            amount: 5,
            unit: LockUnit::DiamondLock,
        };
        let account = credit_deposit(&store, &notice).await.unwrap().unwrap();
        assert_eq!(account.balance, 500);
        assert_eq!(account.balance_history, 500);
        assert_eq!(account.sawer, 0);
    }

    #[tokio::test]
    async fn test_credit_diamond_lock_overflow_is_refused() {
        let store = MemoryStore::new();
        store.insert(Account::new("7", "Bob"));

        let notice = DepositNotice::Lock {
            name: "bob".to_string(),
            amount: 99999999999999999,
            unit: LockUnit::DiamondLock,
        };
        assert!(matches!(
            credit_deposit(&store, &notice).await,
            Err(ProcessError::AmountOutOfRange)
        ));
        let account = retrieve_account(&store, "7").await.unwrap().unwrap();
        assert_eq!(account, Account::new("7", "Bob"));
    }

    #[tokio::test]
    async fn test_credit_world_locks_accumulates() {
        let store = MemoryStore::new();
        store.insert(Account::new("7", "Bob"));

        let notice = DepositNotice::Lock {
            name: "bob".to_string(),
            amount: 5,
            unit: LockUnit::WorldLock,
        };
        credit_deposit(&store, &notice).await.unwrap();
        let account = credit_deposit(&store, &notice).await.unwrap().unwrap();
        assert_eq!(account.balance, 10);
        assert_eq!(account.balance_history, 10);
    }

    #[tokio::test]
    async fn test_credit_saweria_goes_to_sawer() {
        let store = MemoryStore::new();
        store.insert(Account::new("9", "Carol"));

        let notice = DepositNotice::Saweria {
            name: "carol".to_string(),
            amount: 10000,
        };
        let account = credit_deposit(&store, &notice).await.unwrap().unwrap();
        assert_eq!(account.sawer, 10000);
        assert_eq!(account.balance, 0);
        assert_eq!(account.balance_history, 0);
    }

    #[tokio::test]
    async fn test_credit_unknown_name_creates_nothing() {
        let store = MemoryStore::new();
        let notice = DepositNotice::Saweria {
            name: "nobody".to_string(),
            amount: 10000,
        };
        assert_eq!(credit_deposit(&store, &notice).await.unwrap(), None);
        assert_eq!(store.len(), 0);
    }
}
