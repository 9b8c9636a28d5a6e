//! Repository for the `user_sessions` table.
//!
//! A refresh token is single-use: [`SessionRepo::redeem`] revokes the row in
//! the same statement that validates it, so two concurrent refreshes of one
//! token cannot both succeed.

use careoffice_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::session::{NewSession, RedeemedSession};

pub struct SessionRepo;

impl SessionRepo {
    /// Record a new session and return its id.
    pub async fn open<'e, E>(executor: E, session: &NewSession) -> Result<DbId, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at, user_agent, ip_address)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(session.user_id)
        .bind(&session.refresh_token_hash)
        .bind(session.expires_at)
        .bind(&session.user_agent)
        .bind(&session.ip_address)
        .fetch_one(executor)
        .await
    }

    /// Consume the live session whose token hashes to `token_hash`.
    ///
    /// `None` when no such session exists, it has expired, or it was already
    /// revoked (including by a concurrent redeem).
    pub async fn redeem<'e, E>(
        executor: E,
        token_hash: &str,
    ) -> Result<Option<RedeemedSession>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, RedeemedSession>(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING id, user_id",
        )
        .bind(token_hash)
        .fetch_optional(executor)
        .await
    }

    /// Revoke every live session of a user; returns how many were revoked.
    pub async fn revoke_all_for_user<'e, E>(executor: E, user_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete sessions that can never be redeemed again.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM user_sessions WHERE is_revoked = true OR expires_at <= NOW()")
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
