use chrono::{DateTime, Utc};
use hopline_common::{ObjectStore, StoreResponse, TraceHeaders, TracePropagator};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

pub const NO_BUCKET_NAME: &str = "No bucket name is provided.";
pub const BODY_PARSE_FAILED: &str = "Failed to parse request body.";
pub const STORE_FAILED: &str = "File is failed to be stored in S3.";
pub const STORE_SUCCEEDED: &str = "File is stored in S3 successfully.";

/// Object key for a file stored at `at`: `<epoch_ms>.json`.
///
/// Two files stored in the same millisecond share a key; the later write wins.
pub fn object_key(at: DateTime<Utc>) -> String {
    format!("{}.json", at.timestamp_millis())
}

/// Writes the `file` field of an invocation payload to S3.
///
/// Every reply has an outer status of 200; failures are reported through
/// `body.success` and `body.message`.
pub struct Storer {
    store: Arc<dyn ObjectStore>,
    propagator: Arc<dyn TracePropagator>,
    bucket_name: Option<String>,
}

impl Storer {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        propagator: Arc<dyn TracePropagator>,
        bucket_name: Option<String>,
    ) -> Self {
        Self {
            store,
            propagator,
            bucket_name,
        }
    }

    pub async fn handle(&self, event: Value) -> StoreResponse {
        // Parent is bound before the span is first entered
        let span = info_span!("store_file");
        self.accept_trace_headers(&event, &span);

        self.store_file(event).instrument(span).await
    }

    async fn store_file(&self, event: Value) -> StoreResponse {
        info!("Lambda is triggered.");

        let Some(bucket) = self.bucket_name.as_deref() else {
            error!("S3_BUCKET_NAME is not set");
            return respond(StoreResponse::failure(NO_BUCKET_NAME));
        };

        let file = event.get("file").unwrap_or(&Value::Null);
        let body = match serde_json::to_vec(file) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to serialize file");
                return respond(StoreResponse::failure(BODY_PARSE_FAILED));
            }
        };

        let key = object_key(Utc::now());
        if let Err(e) = self
            .store
            .put_object(bucket, &key, body, "application/json")
            .await
        {
            error!(bucket, key = %key, error = %e, "Failed to store file");
            return respond(StoreResponse::failure(STORE_FAILED));
        }

        info!(bucket, key = %key, "File stored");
        respond(StoreResponse::success(STORE_SUCCEEDED))
    }

    fn accept_trace_headers(&self, event: &Value, span: &Span) {
        let Some(raw) = event.get("dtHeaders") else {
            debug!("No trace headers in request");
            return;
        };

        match serde_json::from_value::<TraceHeaders>(raw.clone()) {
            Ok(headers) => {
                if !self.propagator.extract(&headers, span) {
                    debug!(headers = headers.len(), "Trace headers carry no usable context");
                }
            }
            Err(e) => warn!(error = %e, "Ignoring malformed trace headers"),
        }
    }
}

fn respond(response: StoreResponse) -> StoreResponse {
    info!(
        success = response.body.success,
        message = ?response.body.message,
        "Responding"
    );
    response
}
