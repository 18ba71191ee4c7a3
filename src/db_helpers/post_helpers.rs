use sqlx::{types::Json, Sqlite, SqlitePool};

use crate::{errors::RequestError, models::Post};

use super::PostRow;

/// Size of the public feed.
pub const FEED_LIMIT: i64 = 50;

const POST_COLUMNS: &str =
    "SELECT id, user_id, username, content, image_url, likes, comments, created_at FROM posts";

pub async fn insert_post(pool: &SqlitePool, post: &Post) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO posts (id, user_id, username, content, image_url, likes, comments, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(&post.id)
    .bind(&post.user_id)
    .bind(&post.username)
    .bind(&post.content)
    .bind(&post.image_url)
    .bind(Json(post.likes.clone()))
    .bind(Json(post.comments.clone()))
    .bind(post.created_at)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get_post_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Post>, RequestError> {
    let query = format!("{POST_COLUMNS} WHERE id = $1");
    let result = sqlx::query_as::<Sqlite, PostRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result.map(Post::from))
}

/// Writes back the embedded likes and comments of a post loaded earlier.
/// Last write wins against any concurrent save of the same post.
pub async fn save_post_engagement(pool: &SqlitePool, post: &Post) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE posts SET likes = $1, comments = $2 WHERE id = $3
        "#,
    )
    .bind(Json(post.likes.clone()))
    .bind(Json(post.comments.clone()))
    .bind(&post.id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn list_latest_posts(pool: &SqlitePool, limit: i64) -> Result<Vec<Post>, RequestError> {
    let query = format!("{POST_COLUMNS} ORDER BY created_at DESC, rowid DESC LIMIT $1");
    let result = sqlx::query_as::<Sqlite, PostRow>(&query)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(result.into_iter().map(Post::from).collect())
}

pub async fn list_posts_by_author(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Post>, RequestError> {
    let query = format!("{POST_COLUMNS} WHERE user_id = $1 ORDER BY created_at DESC, rowid DESC");
    let result = sqlx::query_as::<Sqlite, PostRow>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(result.into_iter().map(Post::from).collect())
}
