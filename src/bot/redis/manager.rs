use std::collections::HashMap;

use redis::{aio::MultiplexedConnection, RedisError};

use super::{
    account::{
        add_account, claim_name, get_account, get_name_owner, increment_account, release_name,
        set_account_name, FIELD_BALANCE, FIELD_BALANCE_HISTORY, FIELD_NAME, FIELD_SAWER,
        FIELD_USER,
    },
    connect::{DBError, RedisStore},
    license::{get_license, FIELD_ACTIVE, FIELD_HWID},
};
use crate::bot::store::{Account, AccountStore, CreditField, License, LicenseStore, NameClaim};

#[derive(thiserror::Error, Debug)]
pub enum CrudError {
    #[error("Redis operation error: {0}")]
    RedisError(RedisError),
    #[error("Redis database error: {0}")]
    DBError(DBError),
    #[error("Malformed record {key}: {reason}")]
    MalformedRecord { key: String, reason: String },
}

// Implement the From trait to convert from RedisError to CrudError
impl From<RedisError> for CrudError {
    fn from(redis_error: RedisError) -> CrudError {
        CrudError::RedisError(redis_error)
    }
}

// Implement the From trait to convert from DBError to CrudError
impl From<DBError> for CrudError {
    fn from(db_error: DBError) -> CrudError {
        CrudError::DBError(db_error)
    }
}

/* Redis Manager
 * Manager represents a module that manages all database operations.
 * No external package should call any of the database operations directly,
 * only through the manager, which exposes them as AccountStore and LicenseStore.
 */

fn read_counter(
    fields: &HashMap<String, String>,
    key: &str,
    field: &str,
) -> Result<i64, CrudError> {
    match fields.get(field) {
        None => Ok(0),
        Some(value) => value.parse().map_err(|_| CrudError::MalformedRecord {
            key: key.to_string(),
            reason: format!("{field} is not an integer: {value}"),
        }),
    }
}

// Builds an Account from a Redis hash. None if the hash is empty.
fn to_account(
    user_id: &str,
    fields: HashMap<String, String>,
) -> Result<Option<Account>, CrudError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let name = fields
        .get(FIELD_NAME)
        .cloned()
        .ok_or_else(|| CrudError::MalformedRecord {
            key: user_id.to_string(),
            reason: "missing name".to_string(),
        })?;

    Ok(Some(Account {
        user: fields
            .get(FIELD_USER)
            .cloned()
            .unwrap_or_else(|| user_id.to_string()),
        name,
        balance: read_counter(&fields, user_id, FIELD_BALANCE)?,
        balance_history: read_counter(&fields, user_id, FIELD_BALANCE_HISTORY)?,
        sawer: read_counter(&fields, user_id, FIELD_SAWER)?,
    }))
}

// Builds a License from a Redis hash. None if the hash is empty.
fn to_license(
    license_key: &str,
    fields: HashMap<String, String>,
) -> Result<Option<License>, CrudError> {
    if fields.is_empty() {
        return Ok(None);
    }

    let active = match fields.get(FIELD_ACTIVE).map(String::as_str) {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") | None => false,
        Some(other) => {
            return Err(CrudError::MalformedRecord {
                key: license_key.to_string(),
                reason: format!("active is not a boolean: {other}"),
            })
        }
    };

    Ok(Some(License {
        active,
        hwid: fields.get(FIELD_HWID).cloned().unwrap_or_default(),
    }))
}

/* Writes a freshly claimed name into the user's account, creating the
 * account if there is none. Returns the previous name on a rename.
 */
async fn assign_claimed_name(
    con: &mut MultiplexedConnection,
    user_id: &str,
    name: &str,
) -> Result<(NameClaim, Option<String>), CrudError> {
    match to_account(user_id, get_account(con, user_id).await?)? {
        Some(mut account) => {
            set_account_name(con, user_id, name).await?;
            let previous = std::mem::replace(&mut account.name, name.to_string());
            Ok((NameClaim::Renamed(account), Some(previous)))
        }
        None => {
            add_account(con, user_id, name).await?;
            Ok((NameClaim::Created(Account::new(user_id, name)), None))
        }
    }
}

impl AccountStore for RedisStore {
    async fn find_by_user(&self, user_id: &str) -> Result<Option<Account>, CrudError> {
        let mut con = self.connect().await?;
        to_account(user_id, get_account(&mut con, user_id).await?)
    }

    /* Claims a name, then creates or renames the account.
     * The claim is a set-if-absent on the lowercased name, so two users
     * racing for the same name cannot both win. If the account cannot be
     * written, the claim is released again.
     */
    async fn claim_name(&self, user_id: &str, name: &str) -> Result<NameClaim, CrudError> {
        let mut con = self.connect().await?;

        if !claim_name(&mut con, name, user_id).await? {
            return Ok(NameClaim::Taken);
        }

        let (claim, previous) = match assign_claimed_name(&mut con, user_id, name).await {
            Ok(assigned) => assigned,
            Err(err) => {
                if let Err(release_err) = release_name(&mut con, name).await {
                    log::error!(
                        "Claim Name - Failed to release name {} for user {}: {}",
                        name,
                        user_id,
                        release_err.to_string()
                    );
                }
                return Err(err);
            }
        };

        if let Some(previous) = previous {
            release_name(&mut con, &previous).await?;
        }
        Ok(claim)
    }

    async fn credit(
        &self,
        name: &str,
        field: CreditField,
        amount: i64,
    ) -> Result<Option<Account>, CrudError> {
        let mut con = self.connect().await?;

        let user_id = match get_name_owner(&mut con, name).await? {
            Some(user_id) => user_id,
            None => return Ok(None),
        };

        let fields: &[&str] = match field {
            CreditField::Balance => &[FIELD_BALANCE, FIELD_BALANCE_HISTORY],
            CreditField::Sawer => &[FIELD_SAWER],
        };
        let account = increment_account(&mut con, &user_id, fields, amount).await?;
        to_account(&user_id, account)
    }
}

impl LicenseStore for RedisStore {
    async fn find_license(&self, license_key: &str) -> Result<Option<License>, CrudError> {
        let mut con = self.connect().await?;
        to_license(license_key, get_license(&mut con, license_key).await?)
    }
}
