//! Refresh-token session records.
//!
//! Only the hash of a refresh token is stored; the plaintext leaves the
//! server once, in the login or refresh response.

use careoffice_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session about to be opened for `user_id`.
#[derive(Debug)]
pub struct NewSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

/// A session consumed by a refresh; it is revoked by the time this is seen.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RedeemedSession {
    pub id: DbId,
    pub user_id: DbId,
}
