//! Follow edge management.
//!
//! Both operations are idempotent: a duplicate follow and an unfollow of
//! a missing edge change nothing and report success. Following yourself
//! is silently skipped.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{follow_repo, user_repo};
use crate::error::{AppError, Result};

pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn resolve_author(&self, username: &str) -> Result<Uuid> {
        let author = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{username}'")))?;
        Ok(author.id)
    }

    /// Follow an author by username.
    pub async fn follow(&self, follower_id: Uuid, author_username: &str) -> Result<()> {
        let author_id = self.resolve_author(author_username).await?;

        if follower_id == author_id {
            tracing::debug!(%follower_id, "self-follow skipped");
            return Ok(());
        }

        let created = follow_repo::create_follow(&self.pool, follower_id, author_id).await?;
        if created {
            tracing::info!(%follower_id, %author_id, "follow created");
        }

        Ok(())
    }

    /// Unfollow an author by username.
    pub async fn unfollow(&self, follower_id: Uuid, author_username: &str) -> Result<()> {
        let author_id = self.resolve_author(author_username).await?;

        let removed = follow_repo::delete_follow(&self.pool, follower_id, author_id).await?;
        if removed {
            tracing::info!(%follower_id, %author_id, "follow removed");
        }

        Ok(())
    }

    /// Whether follower already follows the author.
    pub async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        Ok(follow_repo::exists(&self.pool, follower_id, author_id).await?)
    }
}
