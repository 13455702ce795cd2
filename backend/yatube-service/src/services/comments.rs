//! Comment creation.
//!
//! Invalid text never creates a record and never surfaces an error;
//! the caller redirects to the post detail either way.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, post_repo};
use crate::error::{AppError, Result};
use crate::forms::validate_comment_text;
use crate::models::Comment;

pub struct CommentService {
    pool: PgPool,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a comment to a post. Unknown post is a 404; empty text is a
    /// silent no-op returning `None`.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        raw_text: &str,
    ) -> Result<Option<Comment>> {
        post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;

        let Some(text) = validate_comment_text(raw_text) else {
            tracing::debug!(%post_id, "empty comment discarded");
            return Ok(None);
        };

        let comment = comment_repo::create_comment(&self.pool, post_id, author_id, &text).await?;
        tracing::info!(comment_id = %comment.id, %post_id, "comment created");

        Ok(Some(comment))
    }
}
