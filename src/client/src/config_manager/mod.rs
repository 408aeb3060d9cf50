use anyhow::{Context, Result};
use config::Config as RConfig;
use serde::{Deserialize, Serialize};

use relay_common::constants::{
    DEFAULT_DELIVERY_TIMEOUT_MS, DEFAULT_MAX_IN_FLIGHT, VENDOR_TRACK_DOMAIN,
};

/// Forwarder-level settings. Destination credentials are *not* part of this:
/// they arrive with every batch and are resolved per call.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub delivery_timeout_ms: u64,
    pub max_in_flight: usize,
    pub vendor_domain: String,

    /// Replaces the `https://{hostname}.{vendor_domain}` base entirely.
    /// Used to point at staging or a local test server.
    pub endpoint_override: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            delivery_timeout_ms: DEFAULT_DELIVERY_TIMEOUT_MS,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            vendor_domain: VENDOR_TRACK_DOMAIN.to_string(),
            endpoint_override: None,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Builds the forwarder config from defaults, letting `RELAY_`-prefixed
    /// environment variables override individual fields.
    pub fn load_default_config() -> Result<Config> {
        let builder = RConfig::builder()
            .set_default("delivery_timeout_ms", DEFAULT_DELIVERY_TIMEOUT_MS)?
            .set_default("max_in_flight", DEFAULT_MAX_IN_FLIGHT as u64)?
            .set_default("vendor_domain", VENDOR_TRACK_DOMAIN)?
            .set_default("endpoint_override", None::<String>)?
            .add_source(config::Environment::with_prefix("RELAY").try_parsing(true));

        let config: Config = builder
            .build()?
            .try_deserialize()
            .context("failed to parse forwarder config")?;

        Ok(config)
    }
}
