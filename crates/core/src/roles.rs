//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000002_create_roles_and_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";

/// Every role seeded by the migrations.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_STAFF];

/// Whether `name` is one of the seeded role names.
pub fn is_known_role(name: &str) -> bool {
    ALL_ROLES.contains(&name)
}
