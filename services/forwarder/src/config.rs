use config::ConfigError;
use hopline_common::config::layered;
use hopline_common::{AwsConfig, ServiceConfig, TelemetryConfig};
use serde::Deserialize;

/// Configuration for the forwarder
#[derive(Debug, Clone, Deserialize)]
pub struct ForwarderConfig {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// AWS client configuration
    #[serde(default)]
    pub aws: AwsConfig,
    /// Validator endpoint URL (`LAMBDA_VALIDATOR_URL`)
    pub validator_url: Option<String>,
}

impl ForwarderConfig {
    /// Load configuration from defaults, config files and the environment
    pub fn load() -> Result<Self, ConfigError> {
        layered(crate::COMPONENT, &[("LAMBDA_VALIDATOR_URL", "validator_url")])?
            .build()?
            .try_deserialize()
    }
}
