//! Route configuration
//!
//! Centralized route setup. Mutating routes are wrapped in `RequireAuth`,
//! which turns unauthenticated requests into login redirects.

use actix_web::{web, HttpResponse};
use utoipa::OpenApi;

use crate::handlers;
use crate::middleware::RequireAuth;
use crate::openapi::ApiDoc;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Service endpoints
        .route("/health", web::get().to(handlers::health))
        .route("/health/live", web::get().to(handlers::liveness))
        .route("/api/openapi.json", web::get().to(openapi_json))
        // Listings
        .service(web::resource("/").route(web::get().to(handlers::index)))
        .service(
            web::resource("/follow/")
                .wrap(RequireAuth)
                .route(web::get().to(handlers::follow_index)),
        )
        .service(web::resource("/group/{slug}/").route(web::get().to(handlers::group_posts)))
        // Profiles and follow edges
        .service(web::resource("/profile/{username}/").route(web::get().to(handlers::profile)))
        .service(
            web::resource("/profile/{username}/follow/")
                .wrap(RequireAuth)
                .route(web::post().to(handlers::profile_follow)),
        )
        .service(
            web::resource("/profile/{username}/unfollow/")
                .wrap(RequireAuth)
                .route(web::post().to(handlers::profile_unfollow)),
        )
        // Posts
        .service(
            web::resource("/create/")
                .wrap(RequireAuth)
                .route(web::get().to(handlers::post_create_form))
                .route(web::post().to(handlers::post_create)),
        )
        .service(web::resource("/posts/{post_id}/").route(web::get().to(handlers::post_detail)))
        .service(
            web::resource("/posts/{post_id}/edit/")
                .wrap(RequireAuth)
                .route(web::get().to(handlers::post_edit_form))
                .route(web::post().to(handlers::post_edit)),
        )
        .service(
            web::resource("/posts/{post_id}/comment/")
                .wrap(RequireAuth)
                .route(web::post().to(handlers::add_comment)),
        )
        // Auth
        .service(web::resource("/auth/signup/").route(web::post().to(handlers::signup)))
        .service(
            web::resource("/auth/login/")
                .route(web::get().to(handlers::login_form))
                .route(web::post().to(handlers::login)),
        )
        .service(
            web::resource("/auth/logout/")
                .wrap(RequireAuth)
                .route(web::post().to(handlers::logout)),
        );
}

/// OpenAPI JSON endpoint
async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
