use std::collections::HashMap;

use redis::{aio::MultiplexedConnection, AsyncCommands, RedisResult};

/* Account CRUD Operations
 * Account represents a registered member, keyed by their chat user id.
 * The hash holds the display name and the three counters.
 * A separate index maps the lowercased display name to the user id,
 * which is what keeps names unique regardless of case.
 */

const ACCOUNT_KEY: &str = "account";
const ACCOUNT_NAME_KEY: &str = "account_name";

pub const FIELD_USER: &str = "user";
pub const FIELD_NAME: &str = "name";
pub const FIELD_BALANCE: &str = "balance";
pub const FIELD_BALANCE_HISTORY: &str = "balance_history";
pub const FIELD_SAWER: &str = "sawer";

fn name_key(name: &str) -> String {
    format!("{ACCOUNT_NAME_KEY}:{}", name.to_lowercase())
}

// Adds a new account with zeroed counters
pub async fn add_account(
    con: &mut MultiplexedConnection,
    user_id: &str,
    name: &str,
) -> RedisResult<()> {
    redis::pipe()
        .atomic()
        .hset(format!("{ACCOUNT_KEY}:{user_id}"), FIELD_USER, user_id)
        .ignore()
        .hset(format!("{ACCOUNT_KEY}:{user_id}"), FIELD_NAME, name)
        .ignore()
        .hset(format!("{ACCOUNT_KEY}:{user_id}"), FIELD_BALANCE, 0)
        .ignore()
        .hset(format!("{ACCOUNT_KEY}:{user_id}"), FIELD_BALANCE_HISTORY, 0)
        .ignore()
        .hset(format!("{ACCOUNT_KEY}:{user_id}"), FIELD_SAWER, 0)
        .ignore()
        .query_async(con)
        .await
}

// Gets all fields of an account. Empty if the account does not exist.
pub async fn get_account(
    con: &mut MultiplexedConnection,
    user_id: &str,
) -> RedisResult<HashMap<String, String>> {
    con.hgetall(format!("{ACCOUNT_KEY}:{user_id}")).await
}

// Sets the display name of an account
pub async fn set_account_name(
    con: &mut MultiplexedConnection,
    user_id: &str,
    name: &str,
) -> RedisResult<()> {
    con.hset(format!("{ACCOUNT_KEY}:{user_id}"), FIELD_NAME, name)
        .await
}

// Adds `amount` to each of `fields` in one transaction, returns the account afterwards
pub async fn increment_account(
    con: &mut MultiplexedConnection,
    user_id: &str,
    fields: &[&str],
    amount: i64,
) -> RedisResult<HashMap<String, String>> {
    let key = format!("{ACCOUNT_KEY}:{user_id}");
    let mut pipe = redis::pipe();
    pipe.atomic();
    for field in fields {
        pipe.hincr(&key, *field, amount).ignore();
    }
    pipe.hgetall(&key);

    let (account,): (HashMap<String, String>,) = pipe.query_async(con).await?;
    Ok(account)
}

/* Name index */

// Claims a name for a user. False if the name, in any case, is already claimed.
pub async fn claim_name(
    con: &mut MultiplexedConnection,
    name: &str,
    user_id: &str,
) -> RedisResult<bool> {
    con.set_nx(name_key(name), user_id).await
}

// Gets the user id owning a name, compared case-insensitively
pub async fn get_name_owner(
    con: &mut MultiplexedConnection,
    name: &str,
) -> RedisResult<Option<String>> {
    con.get(name_key(name)).await
}

// Releases a previously claimed name
pub async fn release_name(con: &mut MultiplexedConnection, name: &str) -> RedisResult<()> {
    con.del(name_key(name)).await
}

// Deletes an account and its name
// Mainly for testing purposes
// In application, accounts are never deleted
#[cfg(test)]
pub async fn delete_account(
    con: &mut MultiplexedConnection,
    user_id: &str,
    name: &str,
) -> RedisResult<()> {
    redis::pipe()
        .del(format!("{ACCOUNT_KEY}:{user_id}"))
        .ignore()
        .del(name_key(name))
        .ignore()
        .query_async(con)
        .await
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::redis::RedisStore;

    async fn connect() -> MultiplexedConnection {
        RedisStore::open("redis://127.0.0.1/")
            .unwrap()
            .connect()
            .await
            .unwrap()
    }

    #[test]
    fn test_name_key_folds_case() {
        assert_eq!(name_key("Alice"), name_key("aLICE"));
        assert_eq!(name_key("Alice"), "account_name:alice");
    }

    #[tokio::test]
    #[ignore = "requires a running redis server"]
    async fn test_add_get_account() {
        let mut con = connect().await;
        let user_id = "test_add_get_account";
        add_account(&mut con, user_id, "Tester").await.unwrap();

        let account = get_account(&mut con, user_id).await.unwrap();
        assert_eq!(account.get(FIELD_NAME).map(String::as_str), Some("Tester"));
        assert_eq!(account.get(FIELD_BALANCE).map(String::as_str), Some("0"));

        delete_account(&mut con, user_id, "Tester").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running redis server"]
    async fn test_claim_name_is_case_insensitive() {
        let mut con = connect().await;
        assert!(claim_name(&mut con, "ClaimTester", "1").await.unwrap());
        assert!(!claim_name(&mut con, "claimtester", "2").await.unwrap());
        assert_eq!(
            get_name_owner(&mut con, "CLAIMTESTER").await.unwrap(),
            Some("1".to_string())
        );
        release_name(&mut con, "ClaimTester").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running redis server"]
    async fn test_increment_account() {
        let mut con = connect().await;
        let user_id = "test_increment_account";
        add_account(&mut con, user_id, "Incrementer").await.unwrap();

        let account = increment_account(
            &mut con,
            user_id,
            &[FIELD_BALANCE, FIELD_BALANCE_HISTORY],
            500,
        )
        .await
        .unwrap();
        assert_eq!(account.get(FIELD_BALANCE).map(String::as_str), Some("500"));
        assert_eq!(
            account.get(FIELD_BALANCE_HISTORY).map(String::as_str),
            Some("500")
        );
        assert_eq!(account.get(FIELD_SAWER).map(String::as_str), Some("0"));

        delete_account(&mut con, user_id, "Incrementer").await.unwrap();
    }
}
