use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

use diary_db::DbError;

use crate::pages;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// Rendered as a redirect to the login page.
    #[error("not authenticated")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("service unavailable")]
    Unavailable,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UsernameTaken => AppError::Conflict("Username already exists".into()),
            DbError::LockPoisoned => AppError::Unavailable,
            DbError::Sqlite(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "That page does not exist."),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.as_str()),
            AppError::Unavailable => {
                error!("Database unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "The diary is temporarily unavailable.")
            }
            AppError::Internal(detail) => {
                error!("Internal error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong.")
            }
        };

        (status, Html(pages::error_page(status, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_redirects_to_login() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[test]
    fn db_errors_map_to_taxonomy() {
        assert!(matches!(AppError::from(DbError::UsernameTaken), AppError::Conflict(_)));
        assert!(matches!(AppError::from(DbError::LockPoisoned), AppError::Unavailable));
        assert_eq!(
            AppError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
