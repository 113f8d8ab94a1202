use config::ConfigError;
use hopline_common::config::layered;
use hopline_common::{AwsConfig, ServiceConfig, TelemetryConfig};
use serde::Deserialize;

/// Configuration for the storer
#[derive(Debug, Clone, Deserialize)]
pub struct StorerConfig {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// AWS client configuration
    #[serde(default)]
    pub aws: AwsConfig,
    /// Target bucket (`S3_BUCKET_NAME`)
    pub bucket_name: Option<String>,
}

impl StorerConfig {
    /// Load configuration from defaults, config files and the environment
    pub fn load() -> Result<Self, ConfigError> {
        layered(crate::COMPONENT, &[("S3_BUCKET_NAME", "bucket_name")])?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_absent_by_default() {
        let config: StorerConfig = layered(crate::COMPONENT, &[])
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(config.bucket_name.is_none());
        assert_eq!(config.service.log_level, "info");
    }
}
