//! Hopline Common
//!
//! Shared capabilities for the hopline serverless file pipeline. Each of the four
//! handlers (forwarder, proxy, storer, validator) is its own Lambda binary; this
//! crate holds everything they have in common: configuration layering, telemetry
//! setup, trace-header propagation, custom events, and thin wrappers around the
//! external services they call.
//!
//! ## Architecture
//!
//! ```text
//!   S3 upload                         API Gateway
//!      │                                   │
//!      ▼                                   ▼
//! ┌──────────────┐   HTTP POST    ┌──────────────┐
//! │ Forwarder    │───────────────▶│ Validator    │
//! └──────────────┘  (no retries)  └──────────────┘
//!
//!   API Gateway
//!      │
//!      ▼
//! ┌──────────────┐  invoke + dtHeaders  ┌──────────────┐   put   ┌──────────────┐
//! │ Proxy        │─────────────────────▶│ Storer       │────────▶│ S3 Bucket    │
//! └──────────────┘◀─────────────────────└──────────────┘         └──────────────┘
//!                  {statusCode, body}
//! ```
//!
//! External calls sit behind traits ([`ObjectStore`], [`FunctionInvoker`],
//! [`JsonPoster`], [`EventRecorder`], [`TracePropagator`]) so handlers can be
//! exercised without AWS. Enable the `mocks` feature to get `mockall` doubles.

pub mod config;
pub mod events;
pub mod gateway;
pub mod http;
pub mod invoke;
pub mod propagation;
pub mod runtime;
pub mod storage;
pub mod store;
pub mod telemetry;

pub use self::config::{AwsConfig, ServiceConfig, TelemetryConfig};
pub use events::{CustomEvent, EventRecorder, TracingEventRecorder};
pub use gateway::{json_body, BodyError, GatewayResponse};
pub use http::{DeliveryError, HttpJsonPoster, JsonPoster};
pub use invoke::{FunctionInvoker, InvokeError, LambdaInvoker};
pub use propagation::{TraceHeaders, TracePropagator, W3cTracePropagator};
pub use storage::{ObjectStore, ObjectStoreError, S3ObjectStore};
pub use store::{StoreResponse, StoreResult};

#[cfg(any(test, feature = "mocks"))]
pub use events::MockEventRecorder;
#[cfg(any(test, feature = "mocks"))]
pub use http::MockJsonPoster;
#[cfg(any(test, feature = "mocks"))]
pub use invoke::MockFunctionInvoker;
#[cfg(any(test, feature = "mocks"))]
pub use propagation::MockTracePropagator;
#[cfg(any(test, feature = "mocks"))]
pub use storage::MockObjectStore;
