//! Hopline Proxy
//!
//! HTTP entry point behind API Gateway. The JSON request body is augmented with a
//! `dtHeaders` trace-header bundle and handed to the storer through a synchronous
//! invocation; the storer's `{success, message}` reply becomes the HTTP response.
//!
//! | Storer outcome                     | Status |
//! |------------------------------------|--------|
//! | `success: true`                    | 200    |
//! | `success: false`                   | 400    |
//! | invoke failed / reply unreadable   | 500    |

pub mod config;
pub mod handler;

pub use self::config::ProxyConfig;
pub use handler::Proxy;

pub const COMPONENT: &str = "proxy";
