//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers enforce role gates through the extractors in
//! [`crate::middleware`], delegate to the repositories in `careoffice_db`
//! and map errors via [`crate::error::AppError`].

pub mod auth;
pub mod client;
pub mod dashboard;
pub mod document;
pub mod file;
pub mod incident;
pub mod job_time;
pub mod metadata;
pub mod user;
