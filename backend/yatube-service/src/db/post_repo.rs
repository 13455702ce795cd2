use crate::models::{Post, PostDetail};
use sqlx::{PgPool, Row};
use uuid::Uuid;

const DETAIL_SELECT: &str = r#"
    SELECT p.id, p.author_id, u.username AS author_username,
           p.group_id, g.slug AS group_slug, g.title AS group_title,
           p.text, p.image, p.created_at
    FROM posts p
    JOIN users u ON u.id = p.author_id
    LEFT JOIN groups g ON g.id = p.group_id
"#;

/// Create a new post
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    group_id: Option<Uuid>,
    text: &str,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (id, author_id, group_id, text, image, created_at)
        VALUES (gen_random_uuid(), $1, $2, $3, $4, NOW())
        RETURNING id, author_id, group_id, text, image, created_at
        "#,
    )
    .bind(author_id)
    .bind(group_id)
    .bind(text)
    .bind(image)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Update a post in place. Author and creation time never change.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    group_id: Option<Uuid>,
    text: &str,
    image: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        UPDATE posts
        SET group_id = $1, text = $2, image = COALESCE($3, image)
        WHERE id = $4
        RETURNING id, author_id, group_id, text, image, created_at
        "#,
    )
    .bind(group_id)
    .bind(text)
    .bind(image)
    .bind(post_id)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by id
pub async fn find_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, author_id, group_id, text, image, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post joined with author and group for the detail page
pub async fn find_detail_by_id(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let query = format!("{DETAIL_SELECT} WHERE p.id = $1");
    sqlx::query_as::<_, PostDetail>(&query)
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// All posts, newest first
pub async fn list_all(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query = format!("{DETAIL_SELECT} ORDER BY p.created_at DESC LIMIT $1 OFFSET $2");
    sqlx::query_as::<_, PostDetail>(&query)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count all posts
pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts")
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

/// Posts in a group, newest first
pub async fn list_by_group(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query =
        format!("{DETAIL_SELECT} WHERE p.group_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3");
    sqlx::query_as::<_, PostDetail>(&query)
        .bind(group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count posts in a group
pub async fn count_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

/// Posts by an author, newest first
pub async fn list_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query = format!(
        "{DETAIL_SELECT} WHERE p.author_id = $1 ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, PostDetail>(&query)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count posts by an author
pub async fn count_by_author(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(row.get::<i64, _>("count"))
}

/// Posts authored by users the given user follows, newest first
pub async fn list_by_followed(
    pool: &PgPool,
    follower_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let query = format!(
        r#"{DETAIL_SELECT}
        JOIN follows f ON f.author_id = p.author_id
        WHERE f.follower_id = $1
        ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"#
    );
    sqlx::query_as::<_, PostDetail>(&query)
        .bind(follower_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Count posts visible in the follow feed of a user
pub async fn count_by_followed(pool: &PgPool, follower_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) AS count
        FROM posts p
        JOIN follows f ON f.author_id = p.author_id
        WHERE f.follower_id = $1
        "#,
    )
    .bind(follower_id)
    .fetch_one(pool)
    .await?;
    Ok(row.get::<i64, _>("count"))
}
