//! Users module: listing, lookup and admin deletion

pub mod dto;
pub mod handlers;

#[cfg(test)]
mod tests;

pub use dto::*;
pub use handlers::*;
