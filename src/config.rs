use std::env;

/* Server configuration, read from the environment (and .env) once at startup.
 * Per-bot settings are not part of it, they arrive with each start request.
 */

const DEFAULT_GROWSHOP_HOST: &str = "127.0.0.1";
const DEFAULT_GROWSHOP_PORT: u16 = 3000;

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    // Redis URL of the license database. Without it every license check is a connection error.
    pub license_db_uri: Option<String>,
    // Raw machine id to derive the HWID from, instead of the one the OS reports.
    pub machine_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_GROWSHOP_HOST.to_string(),
            port: DEFAULT_GROWSHOP_PORT,
            license_db_uri: None,
            machine_id: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = non_empty_var("GROWSHOP_HOST").unwrap_or_else(|| DEFAULT_GROWSHOP_HOST.into());
        let port = match non_empty_var("GROWSHOP_PORT") {
            Some(port) => parse_port(&port),
            None => DEFAULT_GROWSHOP_PORT,
        };

        let license_db_uri = non_empty_var("LICENSE_DB_URI");
        if license_db_uri.is_none() {
            log::warn!("Config - LICENSE_DB_URI is not set, license checks will fail");
        }

        ServerConfig {
            host,
            port,
            license_db_uri,
            machine_id: non_empty_var("MACHINE_ID"),
        }
    }
}

// Falls back to the default port if the value is not a valid port.
fn parse_port(value: &str) -> u16 {
    match value.parse::<u16>() {
        Ok(port) => port,
        Err(err) => {
            log::error!(
                "Config - {} is not a valid GROWSHOP_PORT, using {} instead: {}",
                value,
                DEFAULT_GROWSHOP_PORT,
                err.to_string()
            );
            DEFAULT_GROWSHOP_PORT
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
