//! Verified token claims attached to a request

use serde_json::{Map, Value};

use super::jwt::AuthError;

/// Claim map of a token whose signature has already been verified.
///
/// Inserted into request extensions by the authentication middleware.
/// Individual claims are read through typed accessors that fail with
/// `AuthError::Unauthenticated` instead of assuming a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthClaims(Map<String, Value>);

impl AuthClaims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// `sub` claim, if present and a string
    pub fn subject(&self) -> Option<&str> {
        self.0.get("sub").and_then(Value::as_str)
    }

    /// The `is_admin` flag.
    pub fn is_admin(&self) -> Result<bool, AuthError> {
        match self.0.get("is_admin") {
            Some(Value::Bool(flag)) => Ok(*flag),
            Some(_) => Err(AuthError::Unauthenticated(
                "claim 'is_admin' is not a boolean".to_string(),
            )),
            None => Err(AuthError::Unauthenticated(
                "token carries no 'is_admin' claim".to_string(),
            )),
        }
    }
}

impl From<Map<String, Value>> for AuthClaims {
    fn from(claims: Map<String, Value>) -> Self {
        Self::new(claims)
    }
}
