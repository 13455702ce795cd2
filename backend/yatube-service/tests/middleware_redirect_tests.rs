//! Auth middleware contract: unauthenticated requests to guarded routes
//! are redirected to the login page with a `next` return path; valid
//! tokens pass through whether they arrive as a Bearer header or the
//! session cookie.

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App, HttpResponse};
use uuid::Uuid;

use yatube_service::middleware::{CurrentUser, RequireAuth, SESSION_COOKIE};
use yatube_service::security::JwtKeys;

async fn whoami(user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "username": user.username }))
}

fn keys() -> JwtKeys {
    JwtKeys::from_secret("middleware-test-secret", 3600)
}

macro_rules! guarded_app {
    ($keys:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($keys))
                .service(
                    web::resource("/create/")
                        .wrap(RequireAuth)
                        .route(web::get().to(whoami)),
                ),
        )
        .await
    };
}

#[actix_web::test]
async fn missing_token_redirects_to_login_with_next() {
    let app = guarded_app!(keys());

    let req = test::TestRequest::get().uri("/create/").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(location, "/auth/login/?next=%2Fcreate%2F");
}

#[actix_web::test]
async fn next_includes_the_query_string() {
    let app = guarded_app!(keys());

    let req = test::TestRequest::get().uri("/create/?page=2").to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(location, "/auth/login/?next=%2Fcreate%2F%3Fpage%3D2");
}

#[actix_web::test]
async fn bearer_token_passes_and_extractor_sees_the_user() {
    let keys = keys();
    let token = keys.issue(Uuid::new_v4(), "leo").unwrap();
    let app = guarded_app!(keys);

    let req = test::TestRequest::get()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["username"], "leo");
}

#[actix_web::test]
async fn session_cookie_passes() {
    let keys = keys();
    let token = keys.issue(Uuid::new_v4(), "leo").unwrap();
    let app = guarded_app!(keys);

    let req = test::TestRequest::get()
        .uri("/create/")
        .cookie(Cookie::new(SESSION_COOKIE, token))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn garbage_token_redirects() {
    let app = guarded_app!(keys());

    let req = test::TestRequest::get()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
}

#[actix_web::test]
async fn token_signed_with_another_secret_redirects() {
    let other = JwtKeys::from_secret("some-other-secret", 3600);
    let token = other.issue(Uuid::new_v4(), "eve").unwrap();
    let app = guarded_app!(keys());

    let req = test::TestRequest::get()
        .uri("/create/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
}
