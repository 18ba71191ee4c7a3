use serde::{Deserialize, Serialize};

use super::response::{AccountResponse, PostResponse, ProfileResponse};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthWrapper {
    pub token: String,
    pub user: AccountResponse,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileWrapper {
    pub user: ProfileResponse,
    pub posts: Vec<PostResponse>,
}
