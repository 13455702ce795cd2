//! Index and follow feed handlers
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;

use crate::cache::{CachedPage, PageCache};
use crate::error::Result;
use crate::middleware::CurrentUser;
use crate::pagination::PageQuery;
use crate::services::FeedService;

fn cache_key(req: &HttpRequest) -> String {
    match req.query_string() {
        "" => req.path().to_string(),
        query => format!("{}?{}", req.path(), query),
    }
}

/// All posts, newest first, behind the short-lived page cache. A new
/// post can stay invisible here for up to the cache TTL.
#[utoipa::path(
    get,
    path = "/",
    tag = "posts",
    responses(
        (status = 200, description = "Paginated feed of all posts")
    )
)]
pub async fn index(
    pool: web::Data<PgPool>,
    cache: web::Data<PageCache>,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let key = cache_key(&req);

    if let Some(hit) = cache.get(&key) {
        return Ok(HttpResponse::Ok()
            .content_type(hit.content_type.clone())
            .body(hit.body));
    }

    let service = FeedService::new(pool.get_ref().clone());
    let page = service.index_page(query.page.as_deref()).await?;

    let body = serde_json::to_vec(&page)?;
    cache.put(
        key,
        CachedPage {
            body: body.clone(),
            content_type: mime::APPLICATION_JSON.to_string(),
        },
    );

    Ok(HttpResponse::Ok()
        .content_type(mime::APPLICATION_JSON)
        .body(body))
}

/// Posts authored by the users the viewer follows.
#[utoipa::path(
    get,
    path = "/follow/",
    tag = "follow",
    responses(
        (status = 200, description = "Paginated feed of followed authors"),
        (status = 302, description = "Unauthenticated; redirect to login")
    )
)]
pub async fn follow_index(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let service = FeedService::new(pool.get_ref().clone());
    let page = service
        .following_page(user.id, query.page.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(page))
}
