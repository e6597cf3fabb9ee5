//! ShopDesk Core - Shared types library.
//!
//! This crate provides common types used across all ShopDesk components:
//! - `admin` - REST client, session store and resource views for the store backend
//! - `cli` - Command-line front end for the admin console
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
