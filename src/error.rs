use axum::http::StatusCode;
use thiserror::Error;
use tracing::error;

use crate::nutrition::NutritionError;

/// Errors surfaced by the service layer.
///
/// Handlers keep returning `(StatusCode, String)`; the `From` impl below
/// lets them use `?` on anything that produces an `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Unique name already taken.
    #[error("{0}")]
    Conflict(String),

    /// Still referenced by another entity.
    #[error("{0}")]
    InUse(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Nutrition(#[from] NutritionError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::InUse(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Nutrition(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map a repository failure, turning constraint violations into
    /// client-facing messages.
    pub fn from_db(err: anyhow::Error, conflict: &str, in_use: &str) -> Self {
        match db_violation(&err) {
            Some(Violation::Unique) => AppError::Conflict(conflict.to_string()),
            Some(Violation::ForeignKey) => AppError::InUse(in_use.to_string()),
            None => AppError::Internal(err),
        }
    }
}

impl From<AppError> for (StatusCode, String) {
    fn from(err: AppError) -> Self {
        let status = err.status();
        if status.is_server_error() {
            error!(error = %err, "request failed");
            (status, "Internal server error".into())
        } else {
            (status, err.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Unique,
    ForeignKey,
}

pub fn db_violation(err: &anyhow::Error) -> Option<Violation> {
    match err.downcast_ref::<sqlx::Error>()? {
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(Violation::Unique),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => Some(Violation::ForeignKey),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn client_errors_keep_their_message() {
        let (status, msg): (StatusCode, String) =
            AppError::Conflict("A recipe with this name already exists".into()).into();
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(msg, "A recipe with this name already exists");

        let (status, msg): (StatusCode, String) = AppError::NotFound("Day plan").into();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(msg, "Day plan not found");
    }

    #[test]
    fn server_errors_hide_details() {
        let (status, msg): (StatusCode, String) =
            AppError::Nutrition(NutritionError::MissingRecipe(Uuid::nil())).into();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Internal server error");
    }

    #[test]
    fn non_database_errors_are_internal() {
        let err = AppError::from_db(anyhow::anyhow!("boom"), "dup", "used");
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(db_violation(&anyhow::Error::new(sqlx::Error::RowNotFound)), None);
    }
}
