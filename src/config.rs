use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Credentials for the hosted image service. Uploads are only enabled when
/// all three values are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bind_address: SocketAddr,
    pub max_upload_bytes: usize,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;

        let token_ttl_days = match lookup("TOKEN_TTL_DAYS") {
            Some(days) => days
                .parse::<i64>()
                .context("TOKEN_TTL_DAYS must be a whole number of days")?,
            None => DEFAULT_TOKEN_TTL_DAYS,
        };

        let bind_address = lookup("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDRESS must look like host:port")?;

        let max_upload_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(bytes) => bytes
                .parse::<usize>()
                .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let cloudinary = match (
            lookup("CLOUDINARY_CLOUD_NAME"),
            lookup("CLOUDINARY_API_KEY"),
            lookup("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Config {
            database_url,
            jwt_secret,
            token_ttl_days,
            bind_address,
            max_upload_bytes,
            cloudinary,
        })
    }
}
