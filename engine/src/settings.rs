use std::time::Duration;

use config::{Config, ConfigError, File};
use osrm_client::OsrmSettings;
use serde::Deserialize;

#[derive(
    Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    Development,
    Test,
    Production,
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub environment: Environment,
    /// Upper bound on a single routing request.
    #[serde(with = "humantime_serde")]
    pub route_timeout: Duration,
    pub broker_buffer_size: usize,
    pub client_buffer_size: usize,
    pub osrm: OsrmSettings,
}

impl Settings {
    /// Defaults, overlaid by `config/{environment}.yaml`, overlaid by
    /// `FLEET_ENGINE__` prefixed environment variables.
    pub fn new() -> Result<Settings, ConfigError> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "development".into())
            .parse()
            .map_err(|e: strum::ParseError| {
                ConfigError::Message(format!("failed to parse APP_ENVIRONMENT: {e}"))
            })?;

        Config::builder()
            .set_default("environment", environment.to_string())?
            .set_default("route_timeout", "10s")?
            .set_default("broker_buffer_size", 1024)?
            .set_default("client_buffer_size", 64)?
            .set_default("osrm.base_url", "https://router.project-osrm.org")?
            .set_default("osrm.timeout", "10s")?
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(
                config::Environment::with_prefix("FLEET_ENGINE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
