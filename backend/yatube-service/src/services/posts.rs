//! Post creation, editing, and detail retrieval.
//!
//! Create and edit share one save path that branches on whether a target
//! post already exists, mirroring the single form both pages submit.

use std::path::PathBuf;

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{comment_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::forms::{messages, PostForm, Upload};
use crate::models::{CommentDetail, Post, PostDetail};

/// Outcome of a post save attempt
pub enum SaveOutcome {
    Saved(Post),
    /// Validation failed; the form carries field errors and the
    /// submitted values for re-rendering.
    Invalid(Box<PostForm>),
}

pub struct PostService {
    pool: PgPool,
    media_root: PathBuf,
}

impl PostService {
    pub fn new(pool: PgPool, media_root: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            media_root: media_root.into(),
        }
    }

    /// Fetch a post by id, 404 when unknown.
    pub async fn get_post(&self, post_id: Uuid) -> Result<Post> {
        post_repo::find_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))
    }

    /// Post detail with its comments, 404 when unknown.
    pub async fn get_detail(&self, post_id: Uuid) -> Result<(PostDetail, Vec<CommentDetail>)> {
        let post = post_repo::find_detail_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("post {post_id}")))?;
        let comments = comment_repo::list_by_post(&self.pool, post_id).await?;

        Ok((post, comments))
    }

    /// Save a bound form, creating a new post or updating an existing
    /// one. The author and creation time of an existing post never
    /// change. A group slug that resolves to nothing is a field error,
    /// not a 404.
    pub async fn save_post(
        &self,
        mut form: PostForm,
        author_id: Uuid,
        existing: Option<&Post>,
    ) -> Result<SaveOutcome> {
        if !form.is_valid() {
            return Ok(SaveOutcome::Invalid(Box::new(form)));
        }

        let group_id = match form.group.as_deref() {
            Some(slug) => match group_repo::find_by_slug(&self.pool, slug).await? {
                Some(group) => Some(group.id),
                None => {
                    form.add_error("group", messages::UNKNOWN_GROUP);
                    return Ok(SaveOutcome::Invalid(Box::new(form)));
                }
            },
            None => None,
        };

        let image_path = match form.image.as_ref() {
            Some(upload) => Some(self.store_image(upload).await?),
            None => None,
        };

        let post = match existing {
            Some(post) => {
                let updated = post_repo::update_post(
                    &self.pool,
                    post.id,
                    group_id,
                    &form.text,
                    image_path.as_deref(),
                )
                .await?;
                tracing::info!(post_id = %post.id, "post updated");
                updated
            }
            None => {
                let created = post_repo::create_post(
                    &self.pool,
                    author_id,
                    group_id,
                    &form.text,
                    image_path.as_deref(),
                )
                .await?;
                tracing::info!(post_id = %created.id, author_id = %author_id, "post created");
                created
            }
        };

        Ok(SaveOutcome::Saved(post))
    }

    /// Write an uploaded image under the media root and return its
    /// relative path. The format was sniffed during form validation;
    /// sniff again here to pick the extension.
    pub async fn store_image(&self, upload: &Upload) -> Result<String> {
        let format = image::guess_format(&upload.bytes)
            .map_err(|_| AppError::BadRequest(messages::NOT_AN_IMAGE.to_string()))?;
        let ext = format.extensions_str().first().copied().unwrap_or("bin");

        let relative = format!("posts/{}.{}", Uuid::new_v4(), ext);
        let target = self.media_root.join(&relative);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &upload.bytes).await?;

        tracing::debug!(path = %target.display(), "stored uploaded image");

        Ok(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 16]);
        bytes
    }

    fn lazy_pool() -> PgPool {
        PgPoolOptions::new()
            .connect_lazy("postgres://localhost/yatube-test")
            .expect("lazy pool")
    }

    #[tokio::test]
    async fn store_image_writes_under_media_root() {
        let dir = tempfile::tempdir().unwrap();
        let service = PostService::new(lazy_pool(), dir.path());

        let relative = service
            .store_image(&Upload {
                filename: "pic.png".to_string(),
                bytes: png_bytes(),
            })
            .await
            .unwrap();

        assert!(relative.starts_with("posts/"));
        assert!(relative.ends_with(".png"));
        assert!(dir.path().join(&relative).exists());
    }

    #[tokio::test]
    async fn store_image_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let service = PostService::new(lazy_pool(), dir.path());

        let result = service
            .store_image(&Upload {
                filename: "notes.txt".to_string(),
                bytes: b"plain text".to_vec(),
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn invalid_form_short_circuits_before_database_access() {
        let dir = tempfile::tempdir().unwrap();
        // The pool is lazy and no database is running; an invalid form
        // must come back without touching it.
        let service = PostService::new(lazy_pool(), dir.path());

        let form = PostForm::bind(&std::collections::HashMap::new());
        let outcome = service.save_post(form, Uuid::new_v4(), None).await.unwrap();

        match outcome {
            SaveOutcome::Invalid(form) => assert!(!form.is_valid()),
            SaveOutcome::Saved(_) => panic!("empty form must not save"),
        }
    }
}
