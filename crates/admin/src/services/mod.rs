//! Business logic services for the admin console.
//!
//! # Services
//!
//! - `auth` - Email and password sign-in gated on the admin role

pub mod auth;

pub use auth::{AuthError, AuthService};
