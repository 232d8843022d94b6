//! Response envelope shared by every user endpoint
//!
//! Success: `{"error": false, "msg": null, ...payload}`.
//! Failure: `{"error": true, "msg": "...", ...payload with null fields}`.

use serde::Serialize;

/// Fields rendered next to `error` and `msg`.
pub trait Payload: Serialize {
    /// Payload of a failed response: every field null (or zero for counts).
    fn empty() -> Self;
}

/// JSON envelope. Construct through [`ApiEnvelope::success`] or
/// [`ApiEnvelope::failure`] so `error`, `msg` and payload stay consistent.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<P = NoPayload> {
    error: bool,
    msg: Option<String>,
    #[serde(flatten)]
    payload: P,
}

impl<P: Payload> ApiEnvelope<P> {
    pub fn success(payload: P) -> Self {
        Self {
            error: false,
            msg: None,
            payload,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            error: true,
            msg: Some(msg.into()),
            payload: P::empty(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn msg(&self) -> Option<&str> {
        self.msg.as_deref()
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }
}

/// Envelope without payload fields
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoPayload {}

impl Payload for NoPayload {
    fn empty() -> Self {
        NoPayload {}
    }
}
