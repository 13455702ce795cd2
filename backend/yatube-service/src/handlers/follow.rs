//! Follow/unfollow handlers
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::{profile_path, redirect};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::services::FollowService;

/// Follow an author. Idempotent; self-follow is a silent no-op. Always
/// redirects back to the author's profile.
pub async fn profile_follow(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    FollowService::new(pool.get_ref().clone())
        .follow(user.id, &username)
        .await?;

    Ok(redirect(profile_path(&username)))
}

/// Unfollow an author. A missing edge is a silent no-op. Always
/// redirects back to the author's profile.
pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    FollowService::new(pool.get_ref().clone())
        .unfollow(user.id, &username)
        .await?;

    Ok(redirect(profile_path(&username)))
}
