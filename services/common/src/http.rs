use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors delivering a JSON document over HTTP
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Failed to POST to {url}: {message}")]
    Request { url: String, message: String },
}

/// Sends JSON documents to an HTTP endpoint.
///
/// Only transport failures are errors; any HTTP status counts as delivered and is
/// returned to the caller.
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait JsonPoster: Send + Sync {
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, DeliveryError>;
}

/// `reqwest`-backed poster. The client is built once and reused across invocations;
/// requests are sent exactly once with no retry.
pub struct HttpJsonPoster {
    client: reqwest::Client,
}

impl HttpJsonPoster {
    pub fn new() -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hopline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeliveryError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonPoster for HttpJsonPoster {
    #[instrument(skip(self, body))]
    async fn post_json(&self, url: &str, body: &Value) -> Result<u16, DeliveryError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DeliveryError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        debug!(status, "POST delivered");

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpJsonPoster::new().is_ok());
    }

    #[test]
    fn test_delivery_error_names_url() {
        let err = DeliveryError::Request {
            url: "https://example.com/validator".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to POST to https://example.com/validator: connection refused"
        );
    }
}
