//! Non-database storage implementations

mod memory;

pub use memory::{InMemoryRepositoryProvider, InMemoryUserRepository};

#[cfg(test)]
pub(crate) use memory::fixtures;
