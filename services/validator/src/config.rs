use config::ConfigError;
use hopline_common::config::layered;
use hopline_common::{ServiceConfig, TelemetryConfig};
use serde::Deserialize;

/// Configuration for the validator
#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl ValidatorConfig {
    pub fn load() -> Result<Self, ConfigError> {
        layered(crate::COMPONENT, &[])?.build()?.try_deserialize()
    }
}
