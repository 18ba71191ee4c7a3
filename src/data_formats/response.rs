use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Comment, Like, Post, User};

/// Public account fields returned to the caller at signup and login.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub user_id: String,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub image_url: String,
    pub likes: Vec<LikeResponse>,
    pub comments: Vec<CommentResponse>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields without credential material. Counts are list lengths at
/// read time.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub followers_count: usize,
    pub following_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub is_following: bool,
    pub followers_count: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IsFollowingResponse {
    pub is_following: bool,
}

impl AccountResponse {
    pub fn new(
        User {
            id,
            username,
            email,
            ..
        }: User,
    ) -> Self {
        AccountResponse {
            id,
            username,
            email,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        User {
            id,
            username,
            email,
            followers,
            following,
            created_at,
            ..
        }: User,
    ) -> Self {
        ProfileResponse {
            id,
            username,
            email,
            followers_count: followers.len(),
            following_count: following.len(),
            created_at,
        }
    }
}

impl From<Like> for LikeResponse {
    fn from(Like { user_id, username }: Like) -> Self {
        LikeResponse { user_id, username }
    }
}

impl From<Comment> for CommentResponse {
    fn from(
        Comment {
            id,
            user_id,
            username,
            text,
            created_at,
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            user_id,
            username,
            text,
            created_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(
        Post {
            id,
            user_id,
            username,
            content,
            image_url,
            likes,
            comments,
            created_at,
        }: Post,
    ) -> Self {
        PostResponse {
            id,
            user_id,
            username,
            content,
            image_url,
            likes: likes.into_iter().map(LikeResponse::from).collect(),
            comments: comments.into_iter().map(CommentResponse::from).collect(),
            created_at,
        }
    }
}

impl PostResponse {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|like| like.user_id == user_id)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_own_post(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
