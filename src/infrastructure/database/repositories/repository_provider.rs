//! SeaORM implementation of RepositoryProvider

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use super::user_repository::SeaOrmUserRepository;
use crate::domain::{DomainError, DomainResult, RepositoryProvider, UserRepository};

/// Repository provider backed by one SeaORM connection pool.
///
/// `open` verifies the pool can hand out a live connection before any
/// query runs. The repository it returns shares the pool handle: every
/// statement checks a connection out of the pool and returns it when the
/// statement finishes. Failing to acquire or use a connection for a
/// statement surfaces as `DomainError::Connection`, same as a failed ping.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let users = repos.open().await?.list_users().await?;
/// ```
#[derive(Clone)]
pub struct SeaOrmRepositoryProvider {
    db: DatabaseConnection,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RepositoryProvider for SeaOrmRepositoryProvider {
    async fn open(&self) -> DomainResult<Box<dyn UserRepository>> {
        self.ping().await?;
        Ok(Box::new(SeaOrmUserRepository::new(self.db.clone())))
    }

    async fn ping(&self) -> DomainResult<()> {
        self.db.ping().await.map_err(|e| {
            warn!("Database ping failed: {}", e);
            DomainError::Connection(e.to_string())
        })
    }
}
