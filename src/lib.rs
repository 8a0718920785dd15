//! # Electricity Business API
//!
//! REST backend for an EV-charging-station business. This crate carries the
//! authentication and authorization core: stateless JWT access tokens,
//! persisted refresh tokens, and the per-request authorization gate that
//! fronts every API route.
//!
//! ## Architecture
//!
//! - **auth**: password hashing, token codec, principal directory,
//!   refresh-token store, login/refresh gateway, authorization gate
//! - **infrastructure**: database connection, entities and migrations
//! - **interfaces**: HTTP layer (DTOs, handlers, router, Swagger docs)
//! - **config**: TOML application configuration

pub mod auth;
pub mod config;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig};

// Re-export API router
pub use interfaces::http::create_api_router;
