//! Core types for Pomelo.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod status;
pub mod username;

pub use id::*;
pub use money::Money;
pub use status::*;
pub use username::{Username, UsernameError};
