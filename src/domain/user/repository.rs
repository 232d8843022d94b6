use async_trait::async_trait;
use uuid::Uuid;

use super::User;
use crate::domain::DomainResult;

/// Read/delete access to users over one checked-out connection.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>>;
    /// Fails with `DomainError::NotFound` when no row matched.
    async fn delete_user(&self, id: Uuid) -> DomainResult<()>;
}

/// Hands out repositories bound to a live connection.
///
/// `open` is the only place a handler can observe a connection failure;
/// the returned repository releases its connection when dropped.
#[async_trait]
pub trait RepositoryProvider: Send + Sync {
    async fn open(&self) -> DomainResult<Box<dyn UserRepository>>;

    /// Round-trip to the store without handing out a repository.
    async fn ping(&self) -> DomainResult<()>;
}
