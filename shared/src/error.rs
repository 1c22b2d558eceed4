use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    EntityNotFound(String),
    /// One or more booking rules rejected the request. Every failed
    /// rule contributes a reason, in rule order.
    #[error("{}", .0.join(" | "))]
    ValidationFailed(Vec<String>),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    CancellationTooLate(String),
    #[error("{0}")]
    CapacityExceeded(String),
    #[error("{0}")]
    DuplicateEntry(String),
    #[error("{0}")]
    SessionNotFull(String),
    #[error("{0}")]
    RoomConflict(String),
    #[error("{0}")]
    UnprocessableEntity(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("{0}")]
    ConversionEntityError(String),
    #[error(transparent)]
    SpecificOperationError(sqlx::Error),
    #[error("No rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error(transparent)]
    TransactionError(sqlx::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match &self {
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationFailed(_)
            | AppError::CancellationTooLate(_)
            | AppError::SessionNotFull(_)
            | AppError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidState(_)
            | AppError::CapacityExceeded(_)
            | AppError::DuplicateEntry(_)
            | AppError::RoomConflict(_) => StatusCode::CONFLICT,
            e @ (AppError::ConversionEntityError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::TransactionError(_)) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "unexpected error happened"
                );
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status_code, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_reasons_are_joined_in_order() {
        let err = AppError::ValidationFailed(vec![
            "this class is not open for booking".into(),
            "no seats are available for this class".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "this class is not open for booking | no seats are available for this class"
        );
    }
}
