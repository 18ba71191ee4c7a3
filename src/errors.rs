use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use crate::{media::MediaError, JsonResponse};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    NotAuthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    ServerError(String),
    #[error(transparent)]
    DatabaseError(#[from] sqlx::Error),
    #[error(transparent)]
    MediaError(#[from] MediaError),
}

/// Every error leaves the server as `{"message": ...}`. Server faults also
/// carry the underlying error text.
#[derive(Debug, Serialize, Deserialize)]
pub struct RequestErrorJson {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestErrorJson {
    pub fn new(message: &str) -> RequestErrorJson {
        RequestErrorJson {
            message: message.to_string(),
            error: None,
        }
    }

    pub fn server_fault(error: String) -> RequestErrorJson {
        RequestErrorJson {
            message: "Server error".to_string(),
            error: Some(error),
        }
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(value: anyhow::Error) -> Self {
        Self::ServerError(value.to_string())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RequestError::NotAuthorized(_) => StatusCode::UNAUTHORIZED,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::ServerError(_)
            | RequestError::DatabaseError(_)
            | RequestError::MediaError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let json = match self {
            RequestError::BadRequest(message)
            | RequestError::NotAuthorized(message)
            | RequestError::NotFound(message) => RequestErrorJson::new(message),
            RequestError::ServerError(error) => {
                tracing::error!(%error, "request failed");
                RequestErrorJson::server_fault(error.clone())
            }
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                RequestErrorJson::server_fault(e.to_string())
            }
            RequestError::MediaError(e) => {
                tracing::error!(error = %e, "media upload error");
                RequestErrorJson::server_fault(e.to_string())
            }
        };
        (self.status_code(), Json(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_only_carry_a_message() {
        let (status, Json(body)) = RequestError::BadRequest("Cannot follow yourself").to_json_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Cannot follow yourself");
        assert!(body.error.is_none());

        let (status, _) = RequestError::NotFound("Post not found").to_json_response();
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = RequestError::NotAuthorized("Token is not valid").to_json_response();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn server_faults_leak_the_underlying_text() {
        let (status, Json(body)) = RequestError::DatabaseError(sqlx::Error::RowNotFound).to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Server error");
        assert_eq!(body.error, Some(sqlx::Error::RowNotFound.to_string()));

        let (_, Json(body)) = RequestError::MediaError(MediaError::NotConfigured).to_json_response();
        assert_eq!(body.error, Some(MediaError::NotConfigured.to_string()));
    }

    #[test]
    fn error_body_omits_absent_error_field() {
        let text = serde_json::to_string(&RequestErrorJson::new("User not found")).unwrap();
        assert_eq!(text, r#"{"message":"User not found"}"#);
    }
}
