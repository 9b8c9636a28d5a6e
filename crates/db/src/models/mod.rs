//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches

pub mod client;
pub mod client_document;
pub mod dashboard;
pub mod incident;
pub mod job_time;
pub mod page;
pub mod role;
pub mod session;
pub mod user;
