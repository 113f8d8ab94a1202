//! Hopline Storer
//!
//! Invoked by the proxy with `{file, dtHeaders}`. The trace headers parent this
//! invocation's span on the proxy's, and `file` is written as JSON to
//! `S3_BUCKET_NAME` under `<epoch_ms>.json`.

pub mod config;
pub mod handler;

pub use self::config::StorerConfig;
pub use handler::{object_key, Storer};

pub const COMPONENT: &str = "storer";
