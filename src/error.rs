//! Error handling

use axum::response::IntoResponse;
use tracing::info;

/// Why a generate action produced no image. None of these are fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GenerationError {
    /// The description was empty, so nothing was fetched.
    Validation,
    /// The image endpoint answered with something other than 200.
    RemoteStatus(u16),
    /// Timeout, DNS, connection or decode failure.
    Transport(String),
}

impl GenerationError {
    /// Whether the page should suggest trying again.
    pub fn suggests_retry(&self) -> bool {
        !matches!(self, Self::Validation)
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(
                f,
                "Please enter a description for the beauty transformation!"
            ),
            Self::RemoteStatus(code) => write!(f, "Error: {code}"),
            Self::Transport(description) => write!(f, "{description}"),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Web-facing error definitions for the studio.
#[derive(Debug)]
pub enum BeautyError {
    /// When you didn't do the right thing
    BadRequest,
    /// Missing or invalid session / CSRF token
    Unauthorized,
    /// When a requested resource is not found
    NotFound(String),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<std::io::Error> for BeautyError {
    fn from(err: std::io::Error) -> Self {
        BeautyError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for BeautyError {
    fn from(err: axum::http::Error) -> Self {
        BeautyError::InternalServerError(err.to_string())
    }
}

impl From<image::ImageError> for BeautyError {
    fn from(err: image::ImageError) -> Self {
        BeautyError::InternalServerError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for BeautyError {
    fn from(err: tower_sessions::session::Error) -> Self {
        BeautyError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for BeautyError {
    fn into_response(self) -> axum::response::Response {
        match self {
            BeautyError::BadRequest => {
                info!("Bad request received");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Bad Request"));
                *response.status_mut() = axum::http::StatusCode::BAD_REQUEST;
                response
            }
            BeautyError::Unauthorized => {
                info!("Unauthorized request received");
                let mut response = axum::response::Response::new(axum::body::Body::from(
                    "Unauthorized: invalid or missing session.",
                ));
                *response.status_mut() = axum::http::StatusCode::UNAUTHORIZED;
                response
            }
            BeautyError::NotFound(what) => {
                tracing::debug!("404 {what}");
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Not Found"));
                *response.status_mut() = axum::http::StatusCode::NOT_FOUND;
                response
            }
            BeautyError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                let mut response =
                    axum::response::Response::new(axum::body::Body::from("Internal server error"));
                *response.status_mut() = axum::http::StatusCode::INTERNAL_SERVER_ERROR;
                response
            }
        }
    }
}
