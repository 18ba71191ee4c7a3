use chrono::{DateTime, Utc};
use sqlx::types::Json;

use crate::models::{Comment, Like, Post, User};

mod post_helpers;
mod user_helpers;

pub use post_helpers::*;
pub use user_helpers::*;

// Embedded lists are stored as JSON text columns, so each row maps onto one
// self-contained document.

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password: String,
    followers: Json<Vec<String>>,
    following: Json<Vec<String>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password: row.password,
            followers: row.followers.0,
            following: row.following.0,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: String,
    user_id: String,
    username: String,
    content: String,
    image_url: String,
    likes: Json<Vec<Like>>,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user_id: row.user_id,
            username: row.username,
            content: row.content,
            image_url: row.image_url,
            likes: row.likes.0,
            comments: row.comments.0,
            created_at: row.created_at,
        }
    }
}

pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(e) => e.message().contains("UNIQUE constraint failed"),
        _ => false,
    }
}
