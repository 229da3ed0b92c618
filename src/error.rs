use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No usable credentials: missing bearer header, or bad username/password at login.
    #[error("{0}")]
    Unauthenticated(String),

    /// A credential was presented but is invalid, expired, or names a missing user.
    #[error("Could not validate credentials")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::InvalidToken => "invalid_token",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Conflict(_) => "conflict",
            AppError::Database(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated(_) | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Unauthenticated(msg) | AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(msg) | AppError::Validation(msg) | AppError::Conflict(msg) => {
                msg.clone()
            }
            AppError::InvalidToken => self.to_string(),
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database error");
                "Internal server error".into()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "Internal error");
                "Internal server error".into()
            }
        };

        let challenge = match &self {
            AppError::Unauthenticated(_) => Some(HeaderValue::from_static("Bearer")),
            AppError::InvalidToken => {
                Some(HeaderValue::from_static(r#"Bearer error="invalid_token""#))
            }
            _ => None,
        };

        let body = json!({
            "error": {
                "message": message,
                "kind": self.kind(),
                "code": status.as_u16(),
            }
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = challenge {
            response.headers_mut().insert(WWW_AUTHENTICATE, value);
        }
        response
    }
}

pub type AppResult<T> = Result<T, AppError>;
