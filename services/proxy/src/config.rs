use config::ConfigError;
use hopline_common::config::layered;
use hopline_common::{AwsConfig, ServiceConfig, TelemetryConfig};
use serde::Deserialize;

/// Configuration for the proxy
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub aws: AwsConfig,
    /// Name of the storer function (`LAMBDA_STORER_NAME`)
    pub storer_function_name: Option<String>,
}

impl ProxyConfig {
    pub fn load() -> Result<Self, ConfigError> {
        layered(crate::COMPONENT, &[("LAMBDA_STORER_NAME", "storer_function_name")])?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storer_function_name_from_override() {
        let config: ProxyConfig = layered(crate::COMPONENT, &[])
            .unwrap()
            .set_override("storer_function_name", "hopline-storer")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.service.name, "proxy");
        assert_eq!(config.storer_function_name.as_deref(), Some("hopline-storer"));
        assert!(!config.aws.force_path_style);
    }
}
