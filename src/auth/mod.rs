//! Authentication
//!
//! JWT issuing/verification and the typed claim map handed to handlers.
//! The HTTP middleware that attaches claims lives in `interfaces::http::middleware`.

pub mod claims;
pub mod jwt;

pub use claims::AuthClaims;
pub use jwt::{create_token, verify_token, AuthError, JwtConfig, TokenClaims};
