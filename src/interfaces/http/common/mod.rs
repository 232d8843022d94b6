//! Shared HTTP building blocks: response envelope and error mapping

pub mod envelope;
pub mod error;

pub use envelope::{ApiEnvelope, NoPayload, Payload};
pub use error::{ApiError, StatusPolicy};
