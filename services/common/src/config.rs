use aws_config::BehaviorVersion;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Custom event type name the telemetry backend groups pipeline events under
pub const DEFAULT_CUSTOM_EVENT_TYPE: &str = "MyCustomServerlessEvent";

/// Service-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name for logging/telemetry
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format (json, pretty)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Export spans over OTLP (endpoint and headers come from OTEL_* variables)
    #[serde(default)]
    pub otel_export: bool,
    /// Event type attached to every custom event
    #[serde(default = "default_custom_event_type")]
    pub custom_event_type: String,
}

/// AWS client configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwsConfig {
    /// AWS region (falls back to the default provider chain)
    pub region: Option<String>,
    /// Custom endpoint URL (for LocalStack, MinIO, etc.)
    pub endpoint_url: Option<String>,
    /// Force path-style S3 access (required for MinIO)
    #[serde(default)]
    pub force_path_style: bool,
}

fn default_service_name() -> String {
    "hopline".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_custom_event_type() -> String {
    DEFAULT_CUSTOM_EVENT_TYPE.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otel_export: false,
            custom_event_type: default_custom_event_type(),
        }
    }
}

/// Build the layered configuration source shared by every service.
///
/// Sources, later overriding earlier:
/// 1. Built-in defaults
/// 2. `config/{service}` and `/etc/hopline/{service}` files (optional)
/// 3. Environment variables prefixed with `HOPLINE` (e.g. `HOPLINE__SERVICE__LOG_LEVEL`)
/// 4. Deployment variables mapped explicitly via `deployment_vars` as
///    `(ENV_VAR, config.key)` pairs, e.g. `("S3_BUCKET_NAME", "bucket_name")`
///
/// A deployment variable that is not set leaves its key absent, so the service sees
/// `None` and handles it per invocation.
pub fn layered(
    service: &str,
    deployment_vars: &[(&str, &str)],
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder = config::Config::builder()
        .set_default("service.name", service)?
        .set_default("service.log_level", "info")?
        .set_default("service.log_format", "json")?
        .set_default("telemetry.otel_export", false)?
        .set_default("telemetry.custom_event_type", DEFAULT_CUSTOM_EVENT_TYPE)?
        .set_default("aws.force_path_style", false)?
        .add_source(File::with_name(&format!("config/{}", service)).required(false))
        .add_source(File::with_name(&format!("/etc/hopline/{}", service)).required(false))
        .add_source(
            Environment::with_prefix("HOPLINE")
                .separator("__")
                .try_parsing(true),
        );

    for (var, key) in deployment_vars {
        builder = builder.set_override_option(*key, std::env::var(var).ok())?;
    }

    Ok(builder)
}

/// Load the shared AWS SDK configuration
pub async fn load_sdk_config(config: &AwsConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(ref region) = config.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }

    if let Some(ref endpoint_url) = config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}
