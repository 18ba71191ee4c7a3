use std::sync::Arc;

use crate::errors::RequestError;
use anyhow::{Context, Result};
use argon2::PasswordVerifier;
use argon2::{password_hash::SaltString, Argon2, PasswordHash};
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaim {
    pub user_id: String,
    pub username: String,
    pub exp: i64,
}

/// Signing material for session tokens, shared with handlers as an extension.
pub struct TokenKeys {
    secret: String,
    ttl: time::Duration,
}

impl TokenKeys {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        TokenKeys {
            secret: secret.into(),
            ttl: time::Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, user_id: &str, username: &str) -> Result<String> {
        let expiry_date = OffsetDateTime::now_utc() + self.ttl;
        let claim = AuthClaim {
            user_id: user_id.to_string(),
            username: username.to_string(),
            exp: expiry_date.unix_timestamp(),
        };

        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claim,
            &jsonwebtoken::EncodingKey::from_secret(self.secret.as_ref()),
        )
        .context("Failed to generate jwt token")
    }

    pub fn verify(&self, token: &str) -> Result<AuthClaim, RequestError> {
        let token_data = jsonwebtoken::decode::<AuthClaim>(
            token,
            &jsonwebtoken::DecodingKey::from_secret(self.secret.as_ref()),
            &jsonwebtoken::Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "rejected token");
            RequestError::NotAuthorized("Token is not valid")
        })?;
        let claim = token_data.claims;
        if claim.exp < OffsetDateTime::now_utc().unix_timestamp() {
            return Err(RequestError::NotAuthorized("Token is not valid"));
        }
        Ok(claim)
    }
}

/// The caller identified by a valid bearer token. Claims are trusted as-is;
/// the user document is not re-read.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync + 'static,
{
    type Rejection = RequestError;
    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let keys = parts
            .extensions
            .get::<Arc<TokenKeys>>()
            .cloned()
            .ok_or_else(|| RequestError::ServerError("token keys are not configured".into()))?;

        let header = match parts.headers.get(header::AUTHORIZATION) {
            Some(header) => header,
            None => return Err(RequestError::NotAuthorized("No token, authorization denied")),
        };
        let header = header
            .to_str()
            .map_err(|_| RequestError::NotAuthorized("Token is not valid"))?;

        let token = match header.strip_prefix("Bearer ") {
            Some(token) => token.trim(),
            None => return Err(RequestError::NotAuthorized("No token, authorization denied")),
        };

        let claim = keys.verify(token)?;
        Ok(AuthUser {
            id: claim.user_id,
            username: claim.username,
        })
    }
}

pub async fn verify_password_argon2(password: String, hash: &str) -> Result<bool> {
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || {
        let hash = PasswordHash::new(hash.as_str())
            .map_err(|_| anyhow::anyhow!("Failed to verify password"))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok())
    })
    .await
    .context("Failed to verify password")?
}

pub async fn hash_password_argon2(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(rand::thread_rng());
        let hash = PasswordHash::generate(Argon2::default(), password, salt.as_salt())
            .map_err(|_| anyhow::anyhow!("Failed to hash password"))?;
        Ok(hash.to_string())
    })
    .await
    .context("Failed to hash password")?
}
