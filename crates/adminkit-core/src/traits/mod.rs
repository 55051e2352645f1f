//! Core traits for session behaviour.

mod authenticator;

pub use authenticator::Authenticator;
