//! Paginated post listings: index, group, profile, follow feed.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::post_repo;
use crate::error::Result;
use crate::models::PostDetail;
use crate::pagination::{resolve_page, Page};

pub struct FeedService {
    pool: PgPool,
}

impl FeedService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All posts, newest first.
    pub async fn index_page(&self, raw_page: Option<&str>) -> Result<Page<PostDetail>> {
        let total = post_repo::count_all(&self.pool).await?;
        let request = resolve_page(raw_page, total);
        let items = post_repo::list_all(&self.pool, request.limit, request.offset).await?;

        Ok(Page::new(items, request, total))
    }

    /// Posts in one group, newest first.
    pub async fn group_page(
        &self,
        group_id: Uuid,
        raw_page: Option<&str>,
    ) -> Result<Page<PostDetail>> {
        let total = post_repo::count_by_group(&self.pool, group_id).await?;
        let request = resolve_page(raw_page, total);
        let items =
            post_repo::list_by_group(&self.pool, group_id, request.limit, request.offset).await?;

        Ok(Page::new(items, request, total))
    }

    /// Posts by one author, newest first.
    pub async fn author_page(
        &self,
        author_id: Uuid,
        raw_page: Option<&str>,
    ) -> Result<Page<PostDetail>> {
        let total = post_repo::count_by_author(&self.pool, author_id).await?;
        let request = resolve_page(raw_page, total);
        let items =
            post_repo::list_by_author(&self.pool, author_id, request.limit, request.offset).await?;

        Ok(Page::new(items, request, total))
    }

    /// Posts by the authors a user follows, newest first.
    pub async fn following_page(
        &self,
        follower_id: Uuid,
        raw_page: Option<&str>,
    ) -> Result<Page<PostDetail>> {
        let total = post_repo::count_by_followed(&self.pool, follower_id).await?;
        let request = resolve_page(raw_page, total);
        let items =
            post_repo::list_by_followed(&self.pool, follower_id, request.limit, request.offset)
                .await?;

        Ok(Page::new(items, request, total))
    }
}
