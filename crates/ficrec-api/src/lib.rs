//! Fiction recommendation API
//!
//! An HTTP service where users share fiction recommendations and react to
//! each other's. Accounts authenticate with Argon2-hashed passwords and
//! short-lived JWT access tokens; recommendations carry deduplicated,
//! canonical tags and fiction types; every mutation is gated on ownership.

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod repo;
pub mod routes;
pub mod schema;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
