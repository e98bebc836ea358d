pub mod auth;
pub mod errors;
pub mod routes;
pub mod startup;
pub mod ws;

pub use startup::run;
