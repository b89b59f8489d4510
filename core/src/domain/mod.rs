//! Domain layer - entities and value types of the token lifecycle engine.

pub mod entities;
