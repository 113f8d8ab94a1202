//! Distributed trace propagation across the proxy → storer hop.
//!
//! The proxy writes the current span's context into a [`TraceHeaders`] bundle and
//! ships it inside the invocation payload as `dtHeaders`; the storer reads it back
//! and parents its own span on it. The bundle is opaque to business logic.
//!
//! On the wire the bundle is a list of `[key, value]` pairs:
//!
//! ```json
//! [["traceparent", "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01"]]
//! ```
//!
//! A flat `{"key": "value"}` object is accepted on input as well.

use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::TraceContextExt;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, Span};
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Ordered list of trace header key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TraceHeadersRepr")]
pub struct TraceHeaders(Vec<(String, String)>);

#[derive(Deserialize)]
#[serde(untagged)]
enum TraceHeadersRepr {
    Pairs(Vec<(String, String)>),
    Map(BTreeMap<String, String>),
}

impl From<TraceHeadersRepr> for TraceHeaders {
    fn from(repr: TraceHeadersRepr) -> Self {
        match repr {
            TraceHeadersRepr::Pairs(pairs) => Self(pairs),
            TraceHeadersRepr::Map(map) => Self(map.into_iter().collect()),
        }
    }
}

impl TraceHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Case-insensitive header lookup
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Set a header, replacing any existing value for the same key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// JSON form: an array of `[key, value]` arrays
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|(k, v)| Value::Array(vec![Value::from(k.as_str()), Value::from(v.as_str())]))
                .collect(),
        )
    }
}

impl Injector for TraceHeaders {
    fn set(&mut self, key: &str, value: String) {
        self.insert(key, value);
    }
}

impl Extractor for TraceHeaders {
    fn get(&self, key: &str) -> Option<&str> {
        TraceHeaders::get(self, key)
    }

    fn keys(&self) -> Vec<&str> {
        self.0.iter().map(|(k, _)| k.as_str()).collect()
    }
}

/// Moves trace context in and out of a header carrier
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
pub trait TracePropagator: Send + Sync {
    /// Write the current span's context into `carrier`
    fn inject(&self, carrier: &mut TraceHeaders);

    /// Parent `span` on the context found in `carrier`. `span` must not have been
    /// entered yet. Returns `false` when the carrier holds no valid context or the
    /// span could not take the parent.
    fn extract(&self, carrier: &TraceHeaders, span: &Span) -> bool;
}

/// W3C Trace Context (`traceparent` / `tracestate`) propagator bound to the
/// current `tracing` span
#[derive(Debug, Default)]
pub struct W3cTracePropagator {
    inner: TraceContextPropagator,
}

impl W3cTracePropagator {
    pub fn new() -> Self {
        Self {
            inner: TraceContextPropagator::new(),
        }
    }
}

impl TracePropagator for W3cTracePropagator {
    fn inject(&self, carrier: &mut TraceHeaders) {
        let context = Span::current().context();
        self.inner.inject_context(&context, carrier);
    }

    fn extract(&self, carrier: &TraceHeaders, span: &Span) -> bool {
        let context = self.inner.extract(carrier);
        if !context.span().span_context().is_valid() {
            return false;
        }

        match span.set_parent(context) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "Remote trace context not bound");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
    use serde_json::json;
    use tracing::Subscriber;
    use tracing_subscriber::layer::SubscriberExt;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";
    const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";

    fn otel_subscriber() -> (impl Subscriber + Send + Sync, SdkTracerProvider, InMemorySpanExporter) {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let tracer = provider.tracer("propagation-test");
        let subscriber =
            tracing_subscriber::registry().with(tracing_opentelemetry::layer().with_tracer(tracer));
        (subscriber, provider, exporter)
    }

    fn incoming() -> TraceHeaders {
        let mut headers = TraceHeaders::new();
        headers.insert("traceparent", TRACEPARENT);
        headers
    }

    #[test]
    fn test_headers_serialize_as_pairs() {
        let mut headers = TraceHeaders::new();
        headers.insert("traceparent", TRACEPARENT);
        headers.insert("tracestate", "vendor=1");

        let expected = json!([["traceparent", TRACEPARENT], ["tracestate", "vendor=1"]]);
        assert_eq!(serde_json::to_value(&headers).unwrap(), expected);
        assert_eq!(headers.to_json(), expected);
    }

    #[test]
    fn test_headers_deserialize_pairs_and_map() {
        let pairs: TraceHeaders = serde_json::from_value(json!([["traceparent", TRACEPARENT]])).unwrap();
        let map: TraceHeaders = serde_json::from_value(json!({ "traceparent": TRACEPARENT })).unwrap();

        assert_eq!(pairs, map);
        assert_eq!(pairs.get("TraceParent"), Some(TRACEPARENT));
    }

    #[test]
    fn test_insert_replaces_existing_key() {
        let mut headers = TraceHeaders::new();
        headers.insert("traceparent", "old");
        headers.insert("TRACEPARENT", "new");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("traceparent"), Some("new"));
    }

    #[test]
    fn test_extract_rejects_empty_and_garbage() {
        let (subscriber, _provider, _exporter) = otel_subscriber();

        tracing::subscriber::with_default(subscriber, || {
            let propagator = W3cTracePropagator::new();
            assert!(!propagator.extract(&TraceHeaders::new(), &tracing::info_span!("empty")));

            let mut headers = TraceHeaders::new();
            headers.insert("traceparent", "not-a-traceparent");
            assert!(!propagator.extract(&headers, &tracing::info_span!("garbage")));
        });
    }

    #[test]
    fn test_extract_without_otel_layer_binds_nothing() {
        let propagator = W3cTracePropagator::new();
        let span = tracing::info_span!("storer");

        assert!(!propagator.extract(&incoming(), &span));
    }

    #[test]
    fn test_extract_refuses_started_span() {
        let (subscriber, _provider, _exporter) = otel_subscriber();

        tracing::subscriber::with_default(subscriber, || {
            let propagator = W3cTracePropagator::new();
            let span = tracing::info_span!("storer");
            let _guard = span.enter();

            assert!(!propagator.extract(&incoming(), &span));
        });
    }

    #[test]
    fn test_inject_without_otel_layer_writes_nothing() {
        let propagator = W3cTracePropagator::new();
        let mut headers = TraceHeaders::new();
        propagator.inject(&mut headers);

        assert!(headers.is_empty());
    }

    #[test]
    fn test_extracted_context_is_injected_downstream() {
        let (subscriber, _provider, _exporter) = otel_subscriber();

        tracing::subscriber::with_default(subscriber, || {
            let propagator = W3cTracePropagator::new();

            let span = tracing::info_span!("storer");
            assert!(propagator.extract(&incoming(), &span));
            let _guard = span.enter();

            let mut outgoing = TraceHeaders::new();
            propagator.inject(&mut outgoing);

            let traceparent = outgoing.get("traceparent").unwrap();
            assert!(traceparent.contains(TRACE_ID));
            assert_ne!(traceparent, TRACEPARENT);
        });
    }

    #[test]
    fn test_bound_span_is_exported_under_remote_trace() {
        let (subscriber, provider, exporter) = otel_subscriber();

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("storer");
            assert!(W3cTracePropagator::new().extract(&incoming(), &span));
            span.in_scope(|| tracing::info!("inside"));
        });
        provider.force_flush().unwrap();

        let spans = exporter.get_finished_spans().unwrap();
        let storer = spans.iter().find(|s| s.name == "storer").unwrap();
        assert_eq!(storer.span_context.trace_id().to_string(), TRACE_ID);
        assert_eq!(storer.parent_span_id.to_string(), "00f067aa0ba902b7");
    }
}
