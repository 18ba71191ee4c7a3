use sqlx::{types::Json, Sqlite, SqlitePool};

use crate::{errors::RequestError, models::User};

use super::UserRow;

const USER_COLUMNS: &str =
    "SELECT id, username, email, password, followers, following, created_at FROM users";

pub async fn insert_user(pool: &SqlitePool, user: &User) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password, followers, following, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password)
    .bind(Json(user.followers.clone()))
    .bind(Json(user.following.clone()))
    .bind(user.created_at)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get_user_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, RequestError> {
    let query = format!("{USER_COLUMNS} WHERE id = $1");
    let result = sqlx::query_as::<Sqlite, UserRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(result.map(User::from))
}

pub async fn get_user_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<User>, RequestError> {
    let query = format!("{USER_COLUMNS} WHERE email = $1");
    let result = sqlx::query_as::<Sqlite, UserRow>(&query)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(result.map(User::from))
}

/// Replaces the relationship lists of one user document. Nothing ties this
/// write to the matching write on the other side of the edge.
pub async fn save_user_relationships(pool: &SqlitePool, user: &User) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE users SET followers = $1, following = $2 WHERE id = $3
        "#,
    )
    .bind(Json(user.followers.clone()))
    .bind(Json(user.following.clone()))
    .bind(&user.id)
    .execute(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(())
}
