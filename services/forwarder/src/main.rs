use anyhow::{Context, Result};
use hopline_common::config::load_sdk_config;
use hopline_common::{runtime, telemetry, HttpJsonPoster, S3ObjectStore, TracingEventRecorder};
use hopline_forwarder::{Forwarder, ForwarderConfig, COMPONENT};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ForwarderConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    telemetry::init_telemetry(&config.service, &config.telemetry)?;

    info!(service = %config.service.name, "Starting forwarder");
    if config.validator_url.is_none() {
        warn!("LAMBDA_VALIDATOR_URL is not set; every invocation will be rejected");
    }

    // Clients live for the whole sandbox and are shared by every invocation
    let sdk_config = load_sdk_config(&config.aws).await;
    let store = Arc::new(S3ObjectStore::new(&sdk_config, &config.aws));
    let poster = Arc::new(HttpJsonPoster::new().context("Failed to build HTTP client")?);
    let events = Arc::new(TracingEventRecorder::new(
        config.telemetry.custom_event_type.clone(),
    ));

    let forwarder = Arc::new(Forwarder::new(
        store,
        poster,
        events,
        config.validator_url.clone(),
    ));

    let result = runtime::serve(COMPONENT, move |event| {
        let forwarder = Arc::clone(&forwarder);
        async move {
            forwarder.handle(event).await;
        }
    })
    .await;

    telemetry::shutdown_telemetry();

    result
}
