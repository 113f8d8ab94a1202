//! API Gateway proxy-integration shapes used by the HTTP-facing handlers.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors reading a JSON request body out of a gateway event
#[derive(Error, Debug)]
pub enum BodyError {
    #[error("Request has no body")]
    Missing,

    #[error("Request body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse the `body` string of a gateway event as JSON
pub fn json_body(event: &Value) -> Result<Value, BodyError> {
    let body = event
        .get("body")
        .and_then(Value::as_str)
        .ok_or(BodyError::Missing)?;

    Ok(serde_json::from_str(body)?)
}

/// Gateway response: a status code and an optional JSON-encoded body string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl GatewayResponse {
    /// Response carrying only a status code
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            body: None,
        }
    }

    /// Response with a `{"message": ...}` body
    pub fn message(status_code: u16, message: Option<&str>) -> Self {
        Self {
            status_code,
            body: Some(serde_json::json!({ "message": message }).to_string()),
        }
    }

    /// Decode the body back into JSON
    pub fn json(&self) -> Option<Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}
