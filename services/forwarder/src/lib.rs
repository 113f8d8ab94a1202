//! Hopline Forwarder
//!
//! Triggered by S3 object-created notifications. Each uploaded object is read,
//! decoded as JSON and POSTed to the validator endpoint configured in
//! `LAMBDA_VALIDATOR_URL`. The validator's answer is not inspected.
//!
//! ```text
//! S3 notification ──▶ get_object ──▶ JSON decode ──▶ POST validator
//!                        (record 1, then record 2, ... stop at first failure)
//! ```

pub mod config;
pub mod handler;

pub use self::config::ForwarderConfig;
pub use handler::{ForwardOutcome, Forwarder, UploadNotification, UploadRecord};

/// Component name used for the service name and the invocation span
pub const COMPONENT: &str = "forwarder";
