use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::application::error::ApplicationError;

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApplicationError::NotFound => {
                warn!("Resource not found");
                (StatusCode::NOT_FOUND, "File not found")
            }
            ApplicationError::BadRequest(ref msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad request")
            }
            ApplicationError::UnsupportedMediaType(ref msg) => {
                warn!("Unsupported media type: {}", msg);
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type")
            }
            ApplicationError::Conflict(ref msg) => {
                warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, "File exists")
            }
            ApplicationError::InvalidPath(ref msg) => {
                warn!("Rejected file path: {}", msg);
                (StatusCode::BAD_REQUEST, "Invalid file path")
            }
            ApplicationError::StorageFailure(ref msg) => {
                error!("Storage failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            ApplicationError::DatabaseError(ref msg) => {
                error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
