//! Care office API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! file storage, metadata catalog) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod background;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metadata;
pub mod middleware;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
pub mod storage;
