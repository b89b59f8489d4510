//! Domain entities.

pub mod subject;
pub mod verification_token;

pub use subject::{SubjectRef, SubjectScope};
pub use verification_token::VerificationToken;

#[cfg(test)]
mod tests;
