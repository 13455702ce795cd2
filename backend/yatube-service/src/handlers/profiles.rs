//! Author profile handler
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::Result;
use crate::middleware::MaybeUser;
use crate::pagination::PageQuery;
use crate::services::{FeedService, FollowService, UserService};

/// An author's posts plus whether the viewer already follows them;
/// 404 for an unknown username.
#[utoipa::path(
    get,
    path = "/profile/{username}/",
    tag = "profiles",
    responses(
        (status = 200, description = "Author profile with paginated posts"),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn profile(
    pool: web::Data<PgPool>,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
    viewer: MaybeUser,
) -> Result<HttpResponse> {
    let author = UserService::new(pool.get_ref().clone())
        .get_by_username(&username)
        .await?;

    let following = match viewer.0 {
        Some(user) => {
            FollowService::new(pool.get_ref().clone())
                .is_following(user.id, author.id)
                .await?
        }
        None => false,
    };

    let page = FeedService::new(pool.get_ref().clone())
        .author_page(author.id, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "author": {
            "id": author.id,
            "username": author.username,
        },
        "following": following,
        "page": page,
    })))
}
