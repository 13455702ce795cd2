use sqlx::PgPool;

use crate::db::group_repo;
use crate::error::{AppError, Result};
use crate::models::Group;

pub struct GroupService {
    pool: PgPool,
}

impl GroupService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Look up a group by slug, 404 when unknown.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Group> {
        group_repo::find_by_slug(&self.pool, slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group '{slug}'")))
    }
}
