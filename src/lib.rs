//! Admin backend for site settings and products.
//!
//! [`router::handle`] takes one [`event::ApiRequest`] and always produces an
//! [`event::ApiResponse`]; [`app`] puts it behind HTTP.

pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod event;
pub mod memory;
pub mod products;
pub mod router;
pub mod settings;
pub mod state;
