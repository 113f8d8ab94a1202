use crate::telemetry;
use lambda_runtime::{service_fn, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Run `handler` on the Lambda runtime until the sandbox is shut down.
///
/// Each invocation runs inside an `invocation` span carrying the component name and
/// request id, and pending spans are flushed before the response is returned. The
/// handler never fails an invocation: business failures are part of `R`.
pub async fn serve<F, Fut, R>(component: &'static str, handler: F) -> anyhow::Result<()>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Serialize + Send + 'static,
{
    let handler = Arc::new(handler);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move {
            let span = info_span!(
                "invocation",
                component,
                request_id = %event.context.request_id
            );
            let response = handler(event.payload).instrument(span).await;
            telemetry::flush();
            Ok::<R, lambda_runtime::Error>(response)
        }
    }))
    .await
    .map_err(|e| anyhow::anyhow!(e))
}
