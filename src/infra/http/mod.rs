mod admin;
mod middleware;
mod public;

pub use admin::{AdminState, build_admin_router};
pub use public::{HttpState, build_router};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sqlx::Error as SqlxError;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::repos::RepoError;

fn db_health_response(result: Result<(), SqlxError>) -> Response {
    let Err(err) = result else {
        return StatusCode::NO_CONTENT.into_response();
    };
    let status = StatusCode::SERVICE_UNAVAILABLE;
    let mut response = status.into_response();
    ErrorReport::from_error("infra::http::db_health", status, &err).attach(&mut response);
    response
}

/// Map a repository error to an HTTP error shared by the public and admin surfaces.
pub fn repo_error_to_http(source: &'static str, err: RepoError) -> HttpError {
    let (status, public_message, detail) = match err {
        RepoError::Duplicate { constraint } => {
            (StatusCode::CONFLICT, "Duplicate record", constraint)
        }
        RepoError::Pagination(p) => (StatusCode::BAD_REQUEST, "Invalid page", p.to_string()),
        RepoError::NotFound => (
            StatusCode::NOT_FOUND,
            "Resource not found",
            "no row matched the request".to_string(),
        ),
        RepoError::InvalidInput { message } => (StatusCode::BAD_REQUEST, "Invalid input", message),
        RepoError::Integrity { message } => (
            StatusCode::CONFLICT,
            "Integrity constraint violated",
            message,
        ),
        RepoError::Timeout => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Database timeout",
            "statement canceled".to_string(),
        ),
        RepoError::Persistence(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Persistence error",
            message,
        ),
    };
    HttpError::new(source, status, public_message, detail)
}
