//! Service layer: business logic composed over the repositories.

pub mod auth;

pub use auth::AuthService;
