//! Domain layer - core entities and repository contracts

pub mod user;

pub use user::{RepositoryProvider, User, UserRepository, UserRole};

pub use crate::shared::types::errors::{DomainError, DomainResult};
