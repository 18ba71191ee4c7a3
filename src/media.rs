use serde::Deserialize;
use sha1::{Digest, Sha1};

use crate::config::CloudinaryConfig;

/// Folder every post image is uploaded into.
pub const POST_IMAGE_FOLDER: &str = "social-posts";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("image uploads are not configured")]
    NotConfigured,
    #[error("upload request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("media host rejected upload: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

#[axum::async_trait]
pub trait MediaStore: Send + Sync {
    /// Stores the image under `folder` and returns its durable https URL.
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, MediaError>;
}

pub struct DisabledMediaStore;

#[axum::async_trait]
impl MediaStore for DisabledMediaStore {
    async fn upload(&self, _image: ImageUpload, _folder: &str) -> Result<String, MediaError> {
        Err(MediaError::NotConfigured)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

pub struct CloudinaryStore {
    http: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        CloudinaryStore {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

/// Signature for an authenticated upload: parameters sorted by name, joined
/// as `k=v&k=v`, with the api secret appended, SHA-1 hex encoded.
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[axum::async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> Result<String, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("folder", folder), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
        );

        let file = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature);

        let response = self.http.post(self.upload_url()).multipart(form).send().await?;
        let status = response.status();
        let body: UploadResponse = response.json().await?;

        match (body.secure_url, body.error) {
            (Some(url), _) if status.is_success() && !url.is_empty() => {
                tracing::debug!(%url, "image uploaded");
                Ok(url)
            }
            (_, Some(error)) => Err(MediaError::Rejected(error.message)),
            _ => Err(MediaError::Rejected(format!("unexpected status {status}"))),
        }
    }
}
