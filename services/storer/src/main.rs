use anyhow::{Context, Result};
use hopline_common::config::load_sdk_config;
use hopline_common::{runtime, telemetry, S3ObjectStore, W3cTracePropagator};
use hopline_storer::{Storer, StorerConfig, COMPONENT};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = StorerConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    telemetry::init_telemetry(&config.service, &config.telemetry)?;

    info!(
        service = %config.service.name,
        bucket = ?config.bucket_name,
        "Starting storer"
    );
    if config.bucket_name.is_none() {
        warn!("S3_BUCKET_NAME is not set; no file will be stored");
    }

    let sdk_config = load_sdk_config(&config.aws).await;
    let storer = Arc::new(Storer::new(
        Arc::new(S3ObjectStore::new(&sdk_config, &config.aws)),
        Arc::new(W3cTracePropagator::new()),
        config.bucket_name.clone(),
    ));

    let result = runtime::serve(COMPONENT, move |event| {
        let storer = Arc::clone(&storer);
        async move { storer.handle(event).await }
    })
    .await;

    telemetry::shutdown_telemetry();

    result
}
