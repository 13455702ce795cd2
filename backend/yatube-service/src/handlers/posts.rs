//! Post detail, create, and edit handlers.
//!
//! Create and edit submit the same multipart form. Authorization on edit
//! is a redirect to the read-only detail page, never a 403; validation
//! failures re-render the form with a 200 and the submitted values.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use super::{post_detail_path, profile_path, redirect};
use crate::config::Config;
use crate::error::Result;
use crate::forms::{collect_multipart, PostForm};
use crate::middleware::CurrentUser;
use crate::services::{PostService, SaveOutcome};

fn post_service(pool: &web::Data<PgPool>, config: &Config) -> PostService {
    PostService::new(pool.get_ref().clone(), config.media.root.clone())
}

/// A post with its comments; 404 for an unknown id.
#[utoipa::path(
    get,
    path = "/posts/{post_id}/",
    tag = "posts",
    responses(
        (status = 200, description = "Post detail with comments"),
        (status = 404, description = "Unknown post id")
    )
)]
pub async fn post_detail(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let (post, comments) = post_service(&pool, &config).get_detail(*post_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "post": post,
        "comments": comments,
    })))
}

/// The empty post form.
pub async fn post_create_form(_user: CurrentUser) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(PostForm::default().render(false)))
}

/// Create a post. Success redirects to the author's profile; an invalid
/// form re-renders with field errors.
pub async fn post_create(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: CurrentUser,
    payload: Multipart,
) -> Result<HttpResponse> {
    let fields = collect_multipart(payload, config.media.max_upload_bytes).await?;
    let form = PostForm::bind(&fields);

    match post_service(&pool, &config)
        .save_post(form, user.id, None)
        .await?
    {
        SaveOutcome::Saved(_) => Ok(redirect(profile_path(&user.username))),
        SaveOutcome::Invalid(form) => Ok(HttpResponse::Ok().json(form.render(false))),
    }
}

/// The edit form prefilled with the post's current values. Non-authors
/// are sent to the read-only detail view.
pub async fn post_edit_form(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: CurrentUser,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let service = post_service(&pool, &config);
    let post = service.get_post(*post_id).await?;

    if post.author_id != user.id {
        return Ok(redirect(post_detail_path(post.id)));
    }

    let (detail, _) = service.get_detail(post.id).await?;
    let mut form = PostForm::default();
    form.text = detail.text;
    form.group = detail.group_slug;

    let mut body = form.render(true);
    body["post_id"] = serde_json::json!(post.id);

    Ok(HttpResponse::Ok().json(body))
}

/// Edit a post in place. Only the author gets this far; everyone else is
/// redirected to the detail page without the form ever rendering.
pub async fn post_edit(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: CurrentUser,
    post_id: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse> {
    let service = post_service(&pool, &config);
    let post = service.get_post(*post_id).await?;

    if post.author_id != user.id {
        return Ok(redirect(post_detail_path(post.id)));
    }

    let fields = collect_multipart(payload, config.media.max_upload_bytes).await?;
    let form = PostForm::bind(&fields);

    match service.save_post(form, user.id, Some(&post)).await? {
        SaveOutcome::Saved(saved) => Ok(redirect(post_detail_path(saved.id))),
        SaveOutcome::Invalid(form) => {
            let mut body = form.render(true);
            body["post_id"] = serde_json::json!(post.id);
            Ok(HttpResponse::Ok().json(body))
        }
    }
}
