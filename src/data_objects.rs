use serde::{Deserialize, Serialize};

use crate::{bot::BotSettings, errors::LifecycleError};

/* JSON bodies of the control panel endpoints.
 * Ids arrive as strings, exactly as typed into the dashboard,
 * and are only turned into numbers when a bot is started.
 */

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseRequest {
    #[serde(default)]
    pub license_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseResponse {
    pub valid: bool,
    pub message: String,
}

impl LicenseResponse {
    pub fn valid() -> Self {
        LicenseResponse {
            valid: true,
            message: "License valid".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartBotRequest {
    pub token: String,
    pub prefix: String,
    pub owner_ids: Vec<String>,
    pub history_channel_id: String,
    pub donation_channel_id: String,
    pub stock_channel_id: String,
    pub store_banner: String,
    #[serde(alias = "mongoUri")]
    pub database_uri: String,
}

impl StartBotRequest {
    /* Validates the request into the settings of a bot instance.
     * Blank optional fields become None, blank owner ids are skipped.
     */
    pub fn bot_settings(&self) -> Result<BotSettings, LifecycleError> {
        if self.token.trim().is_empty() {
            return Err(invalid("a bot token is required"));
        }
        if self.prefix.trim().is_empty() {
            return Err(invalid("a command prefix is required"));
        }

        let owner_ids = self
            .owner_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(|id| {
                id.parse::<u64>()
                    .map_err(|_| invalid(&format!("{id} is not a valid owner id")))
            })
            .collect::<Result<Vec<u64>, LifecycleError>>()?;

        Ok(BotSettings {
            prefix: self.prefix.trim().to_string(),
            owner_ids,
            history_channel: parse_channel("historyChannelId", &self.history_channel_id)?,
            donation_channel: parse_channel("donationChannelId", &self.donation_channel_id)?,
            stock_channel: parse_channel("stockChannelId", &self.stock_channel_id)?,
            store_banner: Some(self.store_banner.trim().to_string()).filter(|s| !s.is_empty()),
        })
    }

    pub fn database_uri(&self) -> Result<&str, LifecycleError> {
        match self.database_uri.trim() {
            "" => Err(invalid("a database URI is required")),
            uri => Ok(uri),
        }
    }
}

fn invalid(reason: &str) -> LifecycleError {
    LifecycleError::InvalidSettings(reason.to_string())
}

fn parse_channel(field: &str, value: &str) -> Result<Option<i64>, LifecycleError> {
    match value.trim() {
        "" => Ok(None),
        id => match id.parse::<i64>() {
            Ok(id) => Ok(Some(id)),
            Err(_) => Err(invalid(&format!("{id} is not a valid {field}"))),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleResponse {
    pub success: bool,
    pub message: String,
}

impl LifecycleResponse {
    pub fn success(message: &str) -> Self {
        LifecycleResponse {
            success: true,
            message: message.to_string(),
        }
    }
}
