use axum::extract::Multipart;
use serde::{Deserialize, Serialize};

use crate::{errors::RequestError, media::ImageUpload};

// ----------------- Auth Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ----------------- Post Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct CommentRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Multipart body of a new post: an optional `content` text field and an
/// optional `image` file field. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct NewPostForm {
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl NewPostForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, RequestError> {
        let mut form = NewPostForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|_| RequestError::BadRequest("Malformed multipart body"))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "content" => {
                    form.content = field
                        .text()
                        .await
                        .map_err(|_| RequestError::BadRequest("Malformed multipart body"))?;
                }
                "image" => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|_| RequestError::BadRequest("Malformed multipart body"))?;
                    // Browsers send an empty part when no file was picked.
                    if !bytes.is_empty() {
                        form.image = Some(ImageUpload {
                            bytes: bytes.to_vec(),
                            content_type,
                            file_name,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.image.is_none()
    }
}
