//! Domain types and pure business rules for the care office back office.
//!
//! Nothing in this crate touches the database or HTTP; the `db` and `api`
//! crates build on these types.

pub mod cache;
pub mod document_status;
pub mod error;
pub mod files;
pub mod job_time;
pub mod lookups;
pub mod pagination;
pub mod roles;
pub mod types;
