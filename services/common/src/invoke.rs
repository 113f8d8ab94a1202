use async_trait::async_trait;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use aws_sdk_lambda::Client as LambdaClient;
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Errors invoking another function
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Failed to invoke function {function}: {message}")]
    Invoke { function: String, message: String },
}

/// Synchronous request/response invocation of another function
#[cfg_attr(any(test, feature = "mocks"), mockall::automock)]
#[async_trait]
pub trait FunctionInvoker: Send + Sync {
    /// Invoke `function_name` with `payload` and return the raw reply payload
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError>;
}

/// AWS Lambda invoker
pub struct LambdaInvoker {
    client: LambdaClient,
}

impl LambdaInvoker {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: LambdaClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl FunctionInvoker for LambdaInvoker {
    #[instrument(skip(self, payload), fields(payload_bytes = payload.len()))]
    async fn invoke(&self, function_name: &str, payload: Vec<u8>) -> Result<Vec<u8>, InvokeError> {
        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| InvokeError::Invoke {
                function: function_name.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        // The reply still carries the function's error document; callers decide
        // whether it has the shape they expect.
        if let Some(function_error) = output.function_error() {
            warn!(function_error, "Invoked function reported an error");
        }

        let reply = output
            .payload()
            .map(|blob| blob.as_ref().to_vec())
            .unwrap_or_default();

        debug!(status_code = output.status_code(), reply_bytes = reply.len(), "Function invoked");

        Ok(reply)
    }
}
