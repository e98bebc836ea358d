//! Service layer providing business-oriented operations on top of the
//! entity store.
//! - Separates business logic from the HTTP layer.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;

pub mod auth;
pub mod pagination;
pub mod policy;
pub mod store;

pub mod descriptors;
pub mod drinks;
pub mod reviews;
pub mod shops;
pub mod users;
