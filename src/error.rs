use axum::extract::multipart::MultipartError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::views;

#[derive(Debug, ThisError)]
pub enum ShowroomError {
    #[error("configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("object storage rejected upload with status {status}: {body}")]
    StorageStatus { status: StatusCode, body: String },

    #[error("multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("render error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found")]
    NotFound,
}

impl From<argon2::password_hash::Error> for ShowroomError {
    fn from(e: argon2::password_hash::Error) -> Self {
        ShowroomError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for ShowroomError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ShowroomError::NotFound => {
                return (StatusCode::NOT_FOUND, Html(views::not_found_page())).into_response();
            }
            ShowroomError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ShowroomError::Multipart(e) => (e.status(), "Malformed form submission.".to_string()),
            ShowroomError::StorageStatus { .. }
            | ShowroomError::Reqwest(_)
            | ShowroomError::UrlParse(_) => (
                StatusCode::BAD_GATEWAY,
                "Image storage is unavailable.".to_string(),
            ),
            ShowroomError::DatabaseError(_)
            | ShowroomError::PasswordHash(_)
            | ShowroomError::Template(_)
            | ShowroomError::Render(_)
            | ShowroomError::Config(_)
            | ShowroomError::InvalidConfig(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.".to_string(),
            ),
        };
        if status.is_server_error() {
            error!(error = %self, status = %status, "request failed");
        }
        (status, Html(views::error_page(status, &message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let resp = ShowroomError::NotFound.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_failures_map_to_bad_gateway() {
        let resp = ShowroomError::StorageStatus {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid jwt".to_string(),
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn database_failures_hide_details() {
        let resp = ShowroomError::DatabaseError(SqlxError::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
