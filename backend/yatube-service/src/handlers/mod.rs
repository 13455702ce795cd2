//! HTTP handlers
//!
//! Handlers translate requests into service calls and service results
//! into the status contract: 200 for pages and re-rendered forms, 302
//! for every successful mutation and authorization failure, 404 from
//! the services for unknown slugs/usernames/ids.

pub mod auth;
pub mod comments;
pub mod feed;
pub mod follow;
pub mod groups;
pub mod health;
pub mod posts;
pub mod profiles;

pub use auth::{login, login_form, logout, signup};
pub use comments::add_comment;
pub use feed::{follow_index, index};
pub use follow::{profile_follow, profile_unfollow};
pub use groups::group_posts;
pub use health::{health, liveness};
pub use posts::{post_create, post_create_form, post_detail, post_edit, post_edit_form};
pub use profiles::profile;

use actix_web::http::header;
use actix_web::HttpResponse;

/// A 302 redirect, the response every successful mutation ends with.
pub(crate) fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub(crate) fn post_detail_path(post_id: uuid::Uuid) -> String {
    format!("/posts/{post_id}/")
}

pub(crate) fn profile_path(username: &str) -> String {
    format!("/profile/{username}/")
}
