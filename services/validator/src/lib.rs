//! Hopline Validator
//!
//! HTTP endpoint behind API Gateway that the forwarder posts stored files to.
//! Answers 200 when the payload has non-null `name` and `description`, 400
//! otherwise. The response carries no body.

pub mod config;
pub mod handler;

pub use self::config::ValidatorConfig;
pub use handler::Validator;

pub const COMPONENT: &str = "validator";
