//! OpenAPI documentation for yatube-service
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Yatube API",
        version = "0.1.0",
        description = "Blog service: users author posts optionally tagged to a group, attach images, comment, and follow other authors for a personalized feed.",
        license(name = "MIT")
    ),
    paths(
        handlers::feed::index,
        handlers::feed::follow_index,
        handlers::groups::group_posts,
        handlers::profiles::profile,
        handlers::posts::post_detail,
        handlers::auth::signup,
        handlers::auth::login,
        handlers::health::health,
    ),
    components(schemas(
        crate::models::Group,
        crate::models::Post,
        crate::models::PostDetail,
        crate::models::CommentDetail,
        handlers::auth::SignupRequest,
        handlers::auth::LoginRequest,
        handlers::auth::AuthResponse,
    )),
    tags(
        (name = "health", description = "Service health checks"),
        (name = "posts", description = "Post listings, detail, creation, and editing"),
        (name = "profiles", description = "Author profiles"),
        (name = "follow", description = "Follow edges and the follow feed"),
        (name = "auth", description = "Registration and sessions"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
