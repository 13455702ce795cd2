//! Group listing handler
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::error::Result;
use crate::pagination::PageQuery;
use crate::services::{FeedService, GroupService};

/// Posts in one group, newest first; 404 for an unknown slug.
#[utoipa::path(
    get,
    path = "/group/{slug}/",
    tag = "posts",
    responses(
        (status = 200, description = "Group and its paginated posts"),
        (status = 404, description = "Unknown group slug")
    )
)]
pub async fn group_posts(
    pool: web::Data<PgPool>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let group = GroupService::new(pool.get_ref().clone())
        .get_by_slug(&slug)
        .await?;

    let page = FeedService::new(pool.get_ref().clone())
        .group_page(group.id, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "group": group,
        "page": page,
    })))
}
