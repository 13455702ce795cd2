//! Database-backed property tests.
//!
//! These exercise the invariants that need real storage: follow
//! idempotence, empty-text rejection, pagination splits, and the feed
//! scenarios. They are ignored by default; point DATABASE_URL at a
//! disposable Postgres and run `cargo test -- --ignored`.

use std::collections::HashMap;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use yatube_service::forms::{PostForm, RawField};
use yatube_service::models::User;
use yatube_service::routes::configure_routes;
use yatube_service::security::JwtKeys;
use yatube_service::services::{
    CommentService, FeedService, FollowService, PostService, SaveOutcome, UserService,
};

const SECRET: &str = "db-property-test-secret";

async fn pool() -> PgPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a disposable test database");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");

    pool
}

async fn register_user(pool: &PgPool) -> User {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("u{}", &suffix[..10]);
    let email = format!("{username}@example.com");

    UserService::new(pool.clone())
        .register(&username, &email, "letmein42")
        .await
        .expect("register user")
}

fn text_form(text: &str) -> PostForm {
    let mut fields = HashMap::new();
    fields.insert("text".to_string(), RawField::Text(text.to_string()));
    PostForm::bind(&fields)
}

async fn create_post(pool: &PgPool, author: &User, text: &str) -> yatube_service::models::Post {
    let dir = tempfile::tempdir().unwrap();
    let service = PostService::new(pool.clone(), dir.path());
    match service
        .save_post(text_form(text), author.id, None)
        .await
        .expect("save post")
    {
        SaveOutcome::Saved(post) => post,
        SaveOutcome::Invalid(form) => panic!("valid form rejected: {:?}", form.errors()),
    }
}

async fn follow_edge_count(pool: &PgPool, follower: Uuid, author: Uuid) -> i64 {
    sqlx::query_as::<_, (i64,)>(
        "SELECT COUNT(*) FROM follows WHERE follower_id = $1 AND author_id = $2",
    )
    .bind(follower)
    .bind(author)
    .fetch_one(pool)
    .await
    .expect("count follows")
    .0
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn double_follow_leaves_exactly_one_edge() {
    let pool = pool().await;
    let follower = register_user(&pool).await;
    let author = register_user(&pool).await;

    let service = FollowService::new(pool.clone());
    service.follow(follower.id, &author.username).await.unwrap();
    service.follow(follower.id, &author.username).await.unwrap();

    assert_eq!(follow_edge_count(&pool, follower.id, author.id).await, 1);
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn self_follow_creates_nothing() {
    let pool = pool().await;
    let user = register_user(&pool).await;

    FollowService::new(pool.clone())
        .follow(user.id, &user.username)
        .await
        .unwrap();

    assert_eq!(follow_edge_count(&pool, user.id, user.id).await, 0);
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn unfollow_of_missing_edge_changes_nothing() {
    let pool = pool().await;
    let follower = register_user(&pool).await;
    let author = register_user(&pool).await;

    let service = FollowService::new(pool.clone());
    service
        .unfollow(follower.id, &author.username)
        .await
        .unwrap();

    assert_eq!(follow_edge_count(&pool, follower.id, author.id).await, 0);
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn empty_comment_creates_no_record() {
    let pool = pool().await;
    let author = register_user(&pool).await;
    let post = create_post(&pool, &author, "a post worth discussing").await;

    let service = CommentService::new(pool.clone());
    let outcome = service.add_comment(post.id, author.id, "   ").await.unwrap();
    assert!(outcome.is_none());

    let created = service
        .add_comment(post.id, author.id, "well said")
        .await
        .unwrap();
    assert!(created.is_some());
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn empty_text_never_edits_a_post() {
    let pool = pool().await;
    let author = register_user(&pool).await;
    let post = create_post(&pool, &author, "original text").await;

    let dir = tempfile::tempdir().unwrap();
    let service = PostService::new(pool.clone(), dir.path());
    let outcome = service
        .save_post(text_form(""), author.id, Some(&post))
        .await
        .unwrap();
    assert!(matches!(outcome, SaveOutcome::Invalid(_)));

    let unchanged = service.get_post(post.id).await.unwrap();
    assert_eq!(unchanged.text, "original text");
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn post_without_group_renders_null_group() {
    let pool = pool().await;
    let author = register_user(&pool).await;
    let post = create_post(&pool, &author, "Тестовый пост").await;

    let dir = tempfile::tempdir().unwrap();
    let (detail, comments) = PostService::new(pool.clone(), dir.path())
        .get_detail(post.id)
        .await
        .unwrap();

    assert_eq!(detail.text, "Тестовый пост");
    assert!(detail.group_id.is_none());
    assert!(detail.group_slug.is_none());
    assert!(comments.is_empty());
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn follow_feed_shows_followed_authors_only() {
    let pool = pool().await;
    let reader = register_user(&pool).await;
    let author = register_user(&pool).await;

    FollowService::new(pool.clone())
        .follow(reader.id, &author.username)
        .await
        .unwrap();
    create_post(&pool, &author, "from a followed author").await;

    let feed = FeedService::new(pool.clone());

    let readers_page = feed.following_page(reader.id, None).await.unwrap();
    assert!(!readers_page.items.is_empty());
    assert_eq!(readers_page.items[0].author_username, author.username);

    // The author follows nobody, so their feed is empty
    let authors_page = feed.following_page(author.id, None).await.unwrap();
    assert!(authors_page.items.is_empty());
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn thirteen_posts_paginate_as_ten_plus_three() {
    let pool = pool().await;
    let author = register_user(&pool).await;
    for i in 0..13 {
        create_post(&pool, &author, &format!("post number {i}")).await;
    }

    let feed = FeedService::new(pool.clone());

    let first = feed.author_page(author.id, Some("1")).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.num_pages, 2);
    assert!(first.has_next);

    let second = feed.author_page(author.id, Some("2")).await.unwrap();
    assert_eq!(second.items.len(), 3);
    assert!(!second.has_next);

    // Out-of-range page numbers clamp to the last page
    let clamped = feed.author_page(author.id, Some("9999")).await.unwrap();
    assert_eq!(clamped.page, 2);
    assert_eq!(clamped.items.len(), 3);
}

#[actix_web::test]
#[ignore = "requires DATABASE_URL pointing at a disposable Postgres"]
async fn non_author_edit_redirects_to_detail() {
    let pool = pool().await;
    let author = register_user(&pool).await;
    let intruder = register_user(&pool).await;
    let post = create_post(&pool, &author, "not yours to edit").await;

    let dir = tempfile::tempdir().unwrap();
    let config = yatube_service::config::Config {
        app: yatube_service::config::AppConfig {
            env: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: yatube_service::config::DatabaseConfig {
            url: String::new(),
            max_connections: 2,
            min_connections: 0,
            acquire_timeout_secs: 1,
            idle_timeout_secs: 60,
        },
        auth: yatube_service::config::AuthConfig {
            session_secret: SECRET.to_string(),
            token_ttl_secs: 3600,
        },
        media: yatube_service::config::MediaConfig {
            root: dir.path().display().to_string(),
            max_upload_bytes: 1024 * 1024,
        },
        cache: yatube_service::config::CacheConfig {
            index_ttl_secs: 20,
            max_entries: 16,
        },
        cors: yatube_service::config::CorsConfig {
            allowed_origins: "http://localhost:3000".to_string(),
        },
    };

    let keys = JwtKeys::from_secret(SECRET, 3600);
    let token = keys.issue(intruder.id, &intruder.username).unwrap();

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(keys))
            .app_data(web::Data::new(yatube_service::cache::PageCache::new(
                std::time::Duration::from_secs(20),
                16,
            )))
            .configure(configure_routes),
    )
    .await;

    let uri = format!("/posts/{}/edit/", post.id);
    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some(format!("/posts/{}/", post.id).as_str())
    );
}
