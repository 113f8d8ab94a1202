use anyhow::{Context, Result};
use hopline_common::config::load_sdk_config;
use hopline_common::{runtime, telemetry, LambdaInvoker, W3cTracePropagator};
use hopline_proxy::{Proxy, ProxyConfig, COMPONENT};
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ProxyConfig::load().context("Failed to load configuration")?;

    telemetry::init_telemetry(&config.service, &config.telemetry)?;

    info!(
        service = %config.service.name,
        storer = ?config.storer_function_name,
        "Starting proxy"
    );
    if config.storer_function_name.is_none() {
        warn!("LAMBDA_STORER_NAME is not set; every request will fail with 500");
    }

    let sdk_config = load_sdk_config(&config.aws).await;
    let proxy = Arc::new(Proxy::new(
        Arc::new(LambdaInvoker::new(&sdk_config)),
        Arc::new(W3cTracePropagator::new()),
        config.storer_function_name.clone(),
    ));

    let result = runtime::serve(COMPONENT, move |event| {
        let proxy = Arc::clone(&proxy);
        async move { proxy.handle(event).await }
    })
    .await;

    telemetry::shutdown_telemetry();

    result
}
