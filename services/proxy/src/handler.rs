use hopline_common::{
    json_body, FunctionInvoker, GatewayResponse, StoreResponse, TraceHeaders, TracePropagator,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument};

pub const BODY_PARSE_FAILED: &str = "Request body is failed to be parsed.";
pub const NO_STORER_NAME: &str = "No storer function name is provided.";
pub const STORER_REQUEST_FAILED: &str = "Request to storer lambda is failed.";
pub const STORER_REPLY_UNPARSEABLE: &str = "Storer response is failed to be parsed.";

/// Hands client payloads to the storer and maps its reply to an HTTP status.
///
/// The storer always answers with an outer 200; its inner `success` flag becomes
/// 200 or 400 here. Failing to reach the storer, or to read its reply, is a 500.
pub struct Proxy {
    invoker: Arc<dyn FunctionInvoker>,
    propagator: Arc<dyn TracePropagator>,
    storer_function_name: Option<String>,
}

impl Proxy {
    pub fn new(
        invoker: Arc<dyn FunctionInvoker>,
        propagator: Arc<dyn TracePropagator>,
        storer_function_name: Option<String>,
    ) -> Self {
        Self {
            invoker,
            propagator,
            storer_function_name,
        }
    }

    #[instrument(skip_all)]
    pub async fn handle(&self, event: Value) -> GatewayResponse {
        info!("Lambda is triggered.");

        let mut body = match json_body(&event) {
            Ok(Value::Object(body)) => body,
            Ok(_) => {
                error!("Request body is not a JSON object");
                return respond(400, Some(BODY_PARSE_FAILED));
            }
            Err(e) => {
                error!(error = %e, "Failed to parse request body");
                return respond(400, Some(BODY_PARSE_FAILED));
            }
        };

        let mut headers = TraceHeaders::new();
        self.propagator.inject(&mut headers);
        body.insert("dtHeaders".to_string(), headers.to_json());

        let Some(function_name) = self.storer_function_name.as_deref() else {
            error!("LAMBDA_STORER_NAME is not set");
            return respond(500, Some(NO_STORER_NAME));
        };

        let payload = Value::Object(body).to_string().into_bytes();

        info!(function_name, "Performing request to storer lambda...");
        let reply = match self.invoker.invoke(function_name, payload).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Request to storer lambda failed");
                return respond(500, Some(STORER_REQUEST_FAILED));
            }
        };
        info!("Request is performed to storer lambda successfully.");

        let reply: StoreResponse = match serde_json::from_slice(&reply) {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Failed to parse storer response");
                return respond(500, Some(STORER_REPLY_UNPARSEABLE));
            }
        };

        let status_code = if reply.body.success { 200 } else { 400 };
        respond(status_code, reply.body.message.as_deref())
    }
}

fn respond(status_code: u16, message: Option<&str>) -> GatewayResponse {
    let response = GatewayResponse::message(status_code, message);
    info!(status_code, body = ?response.body, "Responding");
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopline_common::{InvokeError, MockFunctionInvoker, MockTracePropagator};
    use serde_json::json;

    const STORER: &str = "storer-function";

    fn propagator() -> MockTracePropagator {
        let mut propagator = MockTracePropagator::new();
        propagator.expect_inject().returning(|headers| {
            headers.insert(
                "traceparent",
                "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01",
            );
        });
        propagator
    }

    fn request(body: Value) -> Value {
        json!({ "body": body.to_string() })
    }

    fn proxy(invoker: MockFunctionInvoker, storer: Option<&str>) -> Proxy {
        Proxy::new(Arc::new(invoker), Arc::new(propagator()), storer.map(String::from))
    }

    fn invoker_replying(reply: Value) -> MockFunctionInvoker {
        let mut invoker = MockFunctionInvoker::new();
        invoker
            .expect_invoke()
            .times(1)
            .returning(move |_, _| Ok(reply.to_string().into_bytes()));
        invoker
    }

    #[tokio::test]
    async fn test_success_maps_to_200_with_message() {
        let invoker = invoker_replying(json!({
            "statusCode": 200,
            "body": { "success": true, "message": "ok" }
        }));

        let response = proxy(invoker, Some(STORER))
            .handle(request(json!({ "file": { "name": "a" } })))
            .await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.json(), Some(json!({ "message": "ok" })));
    }

    #[tokio::test]
    async fn test_storer_failure_maps_to_400_verbatim() {
        let invoker = invoker_replying(json!({
            "statusCode": 200,
            "body": { "success": false, "message": "No bucket name is provided." }
        }));

        let response = proxy(invoker, Some(STORER))
            .handle(request(json!({ "file": {} })))
            .await;

        assert_eq!(response.status_code, 400);
        assert_eq!(
            response.json(),
            Some(json!({ "message": "No bucket name is provided." }))
        );
    }

    #[tokio::test]
    async fn test_invoke_failure_is_500_regardless_of_body() {
        for body in [json!({ "file": { "name": "a" } }), json!({}), json!({ "x": [1, 2] })] {
            let mut invoker = MockFunctionInvoker::new();
            invoker.expect_invoke().times(1).returning(|function, _| {
                Err(InvokeError::Invoke {
                    function: function.to_string(),
                    message: "ResourceNotFoundException".to_string(),
                })
            });

            let response = proxy(invoker, Some(STORER)).handle(request(body)).await;

            assert_eq!(response.status_code, 500);
            assert_eq!(
                response.json(),
                Some(json!({ "message": STORER_REQUEST_FAILED }))
            );
        }
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_500() {
        let mut invoker = MockFunctionInvoker::new();
        invoker
            .expect_invoke()
            .times(1)
            .returning(|_, _| Ok(b"not json".to_vec()));

        let response = proxy(invoker, Some(STORER)).handle(request(json!({}))).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(
            response.json(),
            Some(json!({ "message": STORER_REPLY_UNPARSEABLE }))
        );
    }

    #[tokio::test]
    async fn test_function_error_document_is_500() {
        let invoker = invoker_replying(json!({
            "errorMessage": "Task timed out after 3.00 seconds",
            "errorType": "Sandbox.Timedout"
        }));

        let response = proxy(invoker, Some(STORER)).handle(request(json!({}))).await;

        assert_eq!(response.status_code, 500);
    }

    #[tokio::test]
    async fn test_payload_carries_body_and_trace_headers() {
        let mut invoker = MockFunctionInvoker::new();
        invoker
            .expect_invoke()
            .withf(|function: &str, payload: &Vec<u8>| {
                let payload: Value = serde_json::from_slice(payload).unwrap();
                function == STORER
                    && payload["file"] == json!({ "name": "a", "description": "d" })
                    && payload["dtHeaders"][0][0] == "traceparent"
            })
            .times(1)
            .returning(|_, _| {
                Ok(br#"{"statusCode":200,"body":{"success":true,"message":"ok"}}"#.to_vec())
            });

        let response = proxy(invoker, Some(STORER))
            .handle(request(json!({ "file": { "name": "a", "description": "d" } })))
            .await;

        assert_eq!(response.status_code, 200);
    }

    #[tokio::test]
    async fn test_missing_storer_name_is_500() {
        let mut invoker = MockFunctionInvoker::new();
        invoker.expect_invoke().never();

        let response = proxy(invoker, None).handle(request(json!({}))).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(response.json(), Some(json!({ "message": NO_STORER_NAME })));
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        for event in [json!({ "body": "{oops" }), json!({}), json!({ "body": "[1,2]" })] {
            let mut invoker = MockFunctionInvoker::new();
            invoker.expect_invoke().never();

            let response = proxy(invoker, Some(STORER)).handle(event).await;

            assert_eq!(response.status_code, 400);
            assert_eq!(response.json(), Some(json!({ "message": BODY_PARSE_FAILED })));
        }
    }
}
