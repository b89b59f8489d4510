//! # Infrastructure Layer
//!
//! Concrete storage for the token lifecycle engine: a MySQL implementation
//! of [`vt_core::TokenRepository`] using SQLx, plus connection pool helpers.

pub mod database;

pub use database::mysql::MySqlTokenRepository;
pub use database::create_pool;
