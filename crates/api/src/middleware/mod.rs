//! HTTP middleware stack for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Bearer-token auth (per-route extractor, not a layer)

pub mod auth;
pub mod request_id;

pub use auth::RequireUser;
pub use request_id::request_id_middleware;
