//! Telemetry initialization: `tracing` subscriber plus optional OTLP span export.
//!
//! OTLP export is off by default and enabled with `telemetry.otel_export`. The
//! exporter reads the standard variables (`OTEL_EXPORTER_OTLP_ENDPOINT`,
//! `OTEL_EXPORTER_OTLP_HEADERS`, ...).
//!
//! A Lambda sandbox is frozen between invocations, so batched spans are flushed at
//! the end of every invocation with [`flush`] rather than left to the background
//! exporter.

use crate::config::{ServiceConfig, TelemetryConfig};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::sync::OnceLock;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Initialize tracing with optional OpenTelemetry export
pub fn init_telemetry(service: &ServiceConfig, telemetry: &TelemetryConfig) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&service.log_level));

    let fmt_layer = if service.log_format == "pretty" {
        fmt::layer().pretty().boxed()
    } else {
        fmt::layer().json().boxed()
    };

    let mut otel_error = None;
    let tracer = if telemetry.otel_export {
        match create_otlp_tracer(&service.name) {
            Ok(tracer) => Some(tracer),
            Err(e) => {
                otel_error = Some(e);
                None
            }
        }
    } else {
        None
    };
    let otel_enabled = tracer.is_some();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)))
        .try_init()?;

    if let Some(e) = otel_error {
        warn!(error = %e, "OTLP export requested but could not be initialized");
    }

    info!(
        service = %service.name,
        otel_export = otel_enabled,
        "Telemetry initialized"
    );

    Ok(())
}

fn create_otlp_tracer(service_name: &str) -> anyhow::Result<opentelemetry_sdk::trace::Tracer> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .build()?;

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(
            opentelemetry_sdk::Resource::builder()
                .with_attribute(KeyValue::new("service.name", service_name.to_string()))
                .build(),
        )
        .build();

    let tracer = tracer_provider.tracer(service_name.to_string());
    let _ = TRACER_PROVIDER.set(tracer_provider);

    Ok(tracer)
}

/// Flush pending spans; a no-op when export is disabled
pub fn flush() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.force_flush() {
            warn!(error = %e, "Failed to flush spans");
        }
    }
}

/// Shut down the tracer provider before process exit
pub fn shutdown_telemetry() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            tracing::error!("Failed to shutdown tracer provider: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_without_provider_is_noop() {
        flush();
        shutdown_telemetry();
        assert!(TRACER_PROVIDER.get().is_none());
    }
}
