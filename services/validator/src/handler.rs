use hopline_common::{json_body, CustomEvent, EventRecorder, GatewayResponse};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// Checks that a payload carries non-null `name` and `description` fields.
///
/// `name` is checked first; only the first missing field is reported. Field types
/// and any other fields are not inspected.
pub struct Validator {
    events: Arc<dyn EventRecorder>,
}

impl Validator {
    pub fn new(events: Arc<dyn EventRecorder>) -> Self {
        Self { events }
    }

    #[instrument(skip_all)]
    pub fn handle(&self, event: &Value) -> GatewayResponse {
        info!("Lambda is triggered.");

        let body = match json_body(event) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Failed to parse request body");
                return self.reject("Request body is failed to be parsed.");
            }
        };
        debug!(body = %body, "Request body parsed");

        if is_missing(&body, "name") {
            return self.reject("Name is not provided.");
        }
        if is_missing(&body, "description") {
            return self.reject("Description is not provided.");
        }

        GatewayResponse::status(200)
    }

    fn reject(&self, message: &str) -> GatewayResponse {
        info!(message, "Payload rejected");
        self.events.record(CustomEvent::new(message));
        GatewayResponse::status(400)
    }
}

fn is_missing(body: &Value, field: &str) -> bool {
    body.get(field).map_or(true, Value::is_null)
}
