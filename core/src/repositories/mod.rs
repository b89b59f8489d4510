//! Repository interfaces for durable token storage.

pub mod token;

pub use token::{TokenQuery, TokenRepository};

#[cfg(test)]
pub use token::MockTokenRepository;
