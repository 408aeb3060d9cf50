use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use relay_common::constants::{SETTING_HOSTNAME, SETTING_TOKEN};

use crate::config_manager::Config;

/// Fatal for the whole batch call: surfaced before any network activity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required setting `{0}` is missing")]
    MissingSetting(&'static str),
    #[error("required setting `{0}` is empty")]
    EmptySetting(&'static str),
    #[error("destination `{hostname}` does not form a valid track URL: {message}")]
    InvalidEndpoint { hostname: String, message: String },
}

/// Account-level settings handed over with each batch. The forwarder reads
/// only `hostname` and `token`; everything else is opaque to it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountSettings(HashMap<String, String>);

impl AccountSettings {
    pub fn new(settings: HashMap<String, String>) -> Self {
        AccountSettings(settings)
    }

    pub fn get_string_setting(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }
}

impl FromIterator<(String, String)> for AccountSettings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        AccountSettings(iter.into_iter().collect())
    }
}

/// Where translated events go. Resolved fresh for every batch so setting
/// changes take effect immediately; never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationConfig {
    pub hostname: String,
    pub token: String,
}

impl DestinationConfig {
    pub fn resolve(settings: &AccountSettings) -> Result<Self, ConfigError> {
        Ok(DestinationConfig {
            hostname: required_setting(settings, SETTING_HOSTNAME)?,
            token: required_setting(settings, SETTING_TOKEN)?,
        })
    }

    /// `https://{hostname}.{vendor_domain}/track/{token}`, unless the
    /// forwarder config overrides the endpoint base.
    pub fn track_url(&self, config: &Config) -> Result<Url, ConfigError> {
        let raw = match &config.endpoint_override {
            Some(base) => format!("{}/track/{}", base.trim_end_matches('/'), self.token),
            None => format!(
                "https://{}.{}/track/{}",
                self.hostname, config.vendor_domain, self.token
            ),
        };

        Url::parse(&raw).map_err(|e| ConfigError::InvalidEndpoint {
            hostname: self.hostname.clone(),
            message: e.to_string(),
        })
    }
}

fn required_setting(
    settings: &AccountSettings,
    name: &'static str,
) -> Result<String, ConfigError> {
    let value = settings
        .get_string_setting(name)
        .ok_or(ConfigError::MissingSetting(name))?
        .trim();

    if value.is_empty() {
        return Err(ConfigError::EmptySetting(name));
    }
    Ok(value.to_string())
}
