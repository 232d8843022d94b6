//! # User Service
//!
//! REST service listing, fetching and (for admins) deleting users. Every
//! response is a JSON envelope `{error, msg, ...payload}`.
//!
//! ## Architecture
//!
//! - **domain**: the `User` model and the repository traits
//! - **infrastructure**: SeaORM/SQLite and in-memory implementations of those traits
//! - **auth**: JWT verification and typed access to token claims
//! - **interfaces**: axum router, handlers, middleware and OpenAPI docs
//! - **server**: runtime wiring and graceful shutdown

pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, ConfigError};

// Re-export database types for easy access
pub use infrastructure::{
    init_database, DatabaseConfig, InMemoryRepositoryProvider, SeaOrmRepositoryProvider,
};

// Re-export API router
pub use interfaces::http::common::{ApiEnvelope, StatusPolicy};
pub use interfaces::http::create_api_router;
