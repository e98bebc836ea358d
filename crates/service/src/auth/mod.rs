//! Credential service: password hashing and bearer-token issuance.

pub mod domain;
pub mod errors;
pub mod service;

pub use domain::{Caller, LoginInput, RegisterInput, TokenPair};
pub use errors::AuthError;
pub use service::{AuthService, AuthTokenConfig};
