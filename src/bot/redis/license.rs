use std::collections::HashMap;

use redis::{aio::MultiplexedConnection, AsyncCommands, RedisResult};

/* License CRUD Operations
 * License lives in its own database, keyed by the license string.
 * Holds an active flag and the hardware id it is bound to.
 * Licenses are issued out of band, so only reads happen here.
 */

const LICENSE_KEY: &str = "license";

pub const FIELD_ACTIVE: &str = "active";
pub const FIELD_HWID: &str = "hwid";

// Gets all fields of a license. Empty if the license does not exist.
pub async fn get_license(
    con: &mut MultiplexedConnection,
    license_key: &str,
) -> RedisResult<HashMap<String, String>> {
    con.hgetall(format!("{LICENSE_KEY}:{license_key}")).await
}

// Adds or replaces a license
// Mainly for testing purposes
#[cfg(test)]
pub async fn set_license(
    con: &mut MultiplexedConnection,
    license_key: &str,
    active: bool,
    hwid: &str,
) -> RedisResult<()> {
    let license: &[(&str, String)] = &[
        (FIELD_ACTIVE, active.to_string()),
        (FIELD_HWID, hwid.to_string()),
    ];
    con.hset_multiple(format!("{LICENSE_KEY}:{license_key}"), license)
        .await
}
