use anyhow::{Context, Result};
use hopline_common::{runtime, telemetry, TracingEventRecorder};
use hopline_validator::{Validator, ValidatorConfig, COMPONENT};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ValidatorConfig::load().context("Failed to load configuration")?;

    telemetry::init_telemetry(&config.service, &config.telemetry)?;

    info!(service = %config.service.name, "Starting validator");

    let validator = Arc::new(Validator::new(Arc::new(TracingEventRecorder::new(
        config.telemetry.custom_event_type.clone(),
    ))));

    let result = runtime::serve(COMPONENT, move |event| {
        let validator = Arc::clone(&validator);
        async move { validator.handle(&event) }
    })
    .await;

    telemetry::shutdown_telemetry();

    result
}
