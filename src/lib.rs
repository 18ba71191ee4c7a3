mod authentication;
pub mod client;
pub mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod handlers;
pub mod media;
mod models;

use anyhow::Context;
pub use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{routing::*, Extension, Json, Router};
pub use authentication::TokenKeys;
pub use config::Config;
pub use data_formats::*;
pub use errors::RequestErrorJson;
use handlers::*;
use media::{CloudinaryStore, DisabledMediaStore, MediaStore};
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use std::{net::TcpListener, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// Shared collaborators every handler can reach through request extensions.
#[derive(Clone)]
pub struct Services {
    pub db: Arc<SqlitePool>,
    pub keys: Arc<TokenKeys>,
    pub media: Arc<dyn MediaStore>,
    pub max_upload_bytes: usize,
}

impl Services {
    pub async fn from_config(config: &Config) -> Result<Self> {
        let db = init_db(&config.database_url).await?;
        let media: Arc<dyn MediaStore> = match &config.cloudinary {
            Some(cloudinary) => Arc::new(CloudinaryStore::new(cloudinary.clone())),
            None => {
                tracing::warn!("Cloudinary credentials missing, image uploads are disabled");
                Arc::new(DisabledMediaStore)
            }
        };
        Ok(Services {
            db: Arc::new(db),
            keys: Arc::new(TokenKeys::new(
                config.jwt_secret.clone(),
                config.token_ttl_days,
            )),
            media,
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}

pub async fn run_app(config: Config) -> Result<()> {
    let services = Services::from_config(&config).await?;
    let app = build_app(make_router(), services);
    let listener = TcpListener::bind(config.bind_address)
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Server started on {}", config.bind_address);
    serve(listener, app).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    axum::Server::from_tcp(listener)?
        .serve(app.into_make_service())
        .await?;
    Ok(())
}

pub fn build_app(router: Router, services: Services) -> Router {
    router
        .layer(DefaultBodyLimit::max(services.max_upload_bytes))
        .layer(Extension(services.db))
        .layer(Extension(services.keys))
        .layer(Extension(services.media))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        info!("Creating database {}", db_url);
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("Failed to create database {}", db_url))?;
    } else {
        info!("Database already exists");
    }
    let pool = SqlitePool::connect(db_url).await?;
    info!("Running Migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations completed");
    Ok(pool)
}

pub fn make_router() -> Router {
    Router::new()
        .route("/check_health", get(alive))
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/me", get(get_current_user))
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/:id/like", post(like_post))
        .route("/posts/:id/comment", post(comment_on_post))
        .route("/users/:id", get(get_profile))
        .route("/users/:id/follow", post(follow_user))
        .route("/users/:id/is-following", get(is_following))
        .fallback(not_found)
}
