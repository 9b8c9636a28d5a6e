//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Most take `&PgPool`; methods that take part in a [`crate::UnitOfWork`]
//! accept any `PgExecutor` so they run on either the pool or a transaction.

pub mod client_document_repo;
pub mod client_repo;
pub mod dashboard_repo;
pub mod incident_repo;
pub mod job_time_repo;
pub mod role_repo;
pub mod session_repo;
pub mod user_repo;

pub use client_document_repo::ClientDocumentRepo;
pub use client_repo::ClientRepo;
pub use dashboard_repo::DashboardRepo;
pub use incident_repo::IncidentRepo;
pub use job_time_repo::JobTimeRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
