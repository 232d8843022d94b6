//! HTTP REST API interfaces
//!
//! - `common`: response envelope, error taxonomy and status policy
//! - `middleware`: JWT authentication middleware
//! - `modules`: health, request id and user handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
