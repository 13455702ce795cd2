//! Comment handler
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use super::{post_detail_path, redirect};
use crate::error::Result;
use crate::forms::CommentFormData;
use crate::middleware::CurrentUser;
use crate::services::CommentService;

/// Add a comment to a post. The response is a redirect to the post
/// detail whether or not the text was valid; empty text just creates
/// nothing. Unknown post ids are a 404.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: CurrentUser,
    post_id: web::Path<Uuid>,
    form: web::Form<CommentFormData>,
) -> Result<HttpResponse> {
    CommentService::new(pool.get_ref().clone())
        .add_comment(*post_id, user.id, &form.text)
        .await?;

    Ok(redirect(post_detail_path(*post_id)))
}
