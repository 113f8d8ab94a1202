//! Reply contract between the storer and its callers.
//!
//! The envelope status is always 200; success or failure travels in `body`.

use serde::{Deserialize, Serialize};

/// Storer reply envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreResponse {
    #[serde(rename = "statusCode", default = "default_status_code")]
    pub status_code: u16,
    pub body: StoreResult,
}

/// Business result of a store request. `success` must be a JSON boolean; any
/// other type makes the whole reply unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_status_code() -> u16 {
    200
}

impl StoreResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_result(true, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::with_result(false, message)
    }

    fn with_result(success: bool, message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: StoreResult {
                success,
                message: Some(message.into()),
            },
        }
    }
}
