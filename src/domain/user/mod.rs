//! User aggregate
//!
//! Contains the User entity and the repository interfaces.

pub mod model;
pub mod repository;

// Re-export model types
pub use model::{User, UserRole};

// Re-export repository traits
pub use repository::{RepositoryProvider, UserRepository};
