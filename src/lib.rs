//! HTTP Basic authentication for axum APIs.
//!
//! - `middleware::basic_auth`: the request stage (challenge or pass-through)
//! - `services::auth`: header parsing, credential store interface, identity/claims
//! - `services::membership`: default Postgres credential store
pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod repos;
pub mod services;
pub mod state;
