//! In-memory storage implementation

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRepository};

#[derive(Default)]
struct MemoryState {
    users: DashMap<Uuid, User>,
    connection_error: Mutex<Option<String>>,
    query_error: Mutex<Option<String>>,
    connection_lost: Mutex<Option<String>>,
    opened: AtomicUsize,
}

impl MemoryState {
    fn connection_error(&self) -> Option<String> {
        self.connection_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn check_query(&self) -> DomainResult<()> {
        let lost = self
            .connection_lost
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(msg) = lost {
            return Err(DomainError::Connection(msg));
        }

        let failure = self
            .query_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match failure {
            Some(msg) => Err(DomainError::Storage(msg)),
            None => Ok(()),
        }
    }
}

/// In-memory user store for development and testing.
///
/// Clones share the same data. Connection and query failures can be
/// injected to exercise error paths.
#[derive(Clone, Default)]
pub struct InMemoryRepositoryProvider {
    state: Arc<MemoryState>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let provider = Self::new();
        for user in users {
            provider.insert(user);
        }
        provider
    }

    pub fn insert(&self, user: User) {
        self.state.users.insert(user.id, user);
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.state.users.contains_key(&id)
    }

    /// Make every subsequent `open` fail with `msg` (or succeed again with `None`).
    pub fn set_connection_error(&self, msg: Option<&str>) {
        *self
            .state
            .connection_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = msg.map(String::from);
    }

    /// Make every query on opened repositories fail with `msg`.
    pub fn set_query_error(&self, msg: Option<&str>) {
        *self
            .state
            .query_error
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = msg.map(String::from);
    }

    /// Let `open` succeed but fail every query with a connection error,
    /// as when the pool drops its connection mid-request.
    pub fn set_connection_lost(&self, msg: Option<&str>) {
        *self
            .state
            .connection_lost
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = msg.map(String::from);
    }

    /// Number of repositories handed out so far.
    pub fn open_count(&self) -> usize {
        self.state.opened.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    async fn open(&self) -> DomainResult<Box<dyn UserRepository>> {
        self.ping().await?;
        self.state.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemoryUserRepository {
            state: Arc::clone(&self.state),
        }))
    }

    async fn ping(&self) -> DomainResult<()> {
        match self.state.connection_error() {
            Some(msg) => Err(DomainError::Connection(msg)),
            None => Ok(()),
        }
    }
}

pub struct InMemoryUserRepository {
    state: Arc<MemoryState>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.state.check_query()?;
        let mut users: Vec<User> = self
            .state
            .users
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        self.state.check_query()?;
        Ok(self.state.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        self.state.check_query()?;
        match self.state.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::user_not_found(id)),
        }
    }
}
