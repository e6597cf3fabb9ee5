//! ShopDesk Admin library.
//!
//! Client side of the store's admin console: an authenticated REST client,
//! the admin session and its persistence, and one resource view per backend
//! collection (users, products, orders) plus the dashboard.
//!
//! # Security
//!
//! Admin access is decided client-side from the unverified token payload,
//! which only controls what the console shows. The backend checks the token
//! on every request and remains the authorization boundary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod console;
pub mod error;
pub mod guard;
pub mod models;
pub mod services;
pub mod session;
pub mod views;

pub use console::AdminConsole;
pub use error::{AdminError, ValidationError};
pub use views::ResourceView;
