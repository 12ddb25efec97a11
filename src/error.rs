use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::model::polyline::PolylineError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("network error: {0}")]
    Network(String),
    #[error("api returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("claim store error: {0}")]
    Store(String),
    #[error("polyline error: {0}")]
    Polyline(#[from] PolylineError),
    #[error("not authorized: {0}")]
    Auth(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Parse(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Store(e.to_string())
    }
}

impl From<String> for AppError {
    fn from(e: String) -> Self {
        Self::Other(e)
    }
}

impl From<&str> for AppError {
    fn from(e: &str) -> Self {
        Self::Other(e.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Invalid(_) | AppError::Parse(_) | AppError::Polyline(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Network(_) | AppError::Api { .. } => StatusCode::BAD_GATEWAY,
            AppError::Store(_) | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let markup = crate::view::render_error(self);
        HttpResponse::build(self.status_code())
            .content_type("text/html")
            .body(markup.into_string())
    }
}
