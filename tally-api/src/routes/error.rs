use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;

use super::envelope::{Envelope, ErrorBody};
use crate::domain::{BoardError, FinanceError, HabitError, ProfileError};

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// A storage or other unexpected failure. The raw text goes to the log
    /// and into `details`; the message stays generic.
    pub fn internal(details: impl Into<String>) -> Self {
        let details = details.into();
        tracing::error!("internal error: {details}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").with_details(details)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: Envelope<()> = Envelope {
            status_code: self.status.as_u16(),
            success: false,
            error: Some(ErrorBody {
                message: self.message,
                details: self.details,
            }),
            data: None,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<FinanceError> for ApiError {
    fn from(err: FinanceError) -> Self {
        match err {
            FinanceError::NotFound(_) => Self::not_found(err.to_string()),
            FinanceError::Invalid(message) => Self::bad_request(message),
            FinanceError::Storage(message) => Self::internal(message),
        }
    }
}

impl From<BoardError> for ApiError {
    fn from(err: BoardError) -> Self {
        match err {
            BoardError::ProjectNotFound
            | BoardError::ColumnNotFound
            | BoardError::TaskNotFound
            | BoardError::NotInvited => Self::not_found(err.to_string()),
            BoardError::AssigneeNotMember | BoardError::NotAMember => {
                Self::bad_request(err.to_string())
            }
            BoardError::Invalid(message) => Self::bad_request(message),
            BoardError::Forbidden(message) => Self::forbidden(message),
            BoardError::ConcurrentMove => Self::conflict(err.to_string()),
            BoardError::Storage(message) => Self::internal(message),
        }
    }
}

impl From<HabitError> for ApiError {
    fn from(err: HabitError) -> Self {
        match err {
            HabitError::NotFound | HabitError::LogNotFound => Self::not_found(err.to_string()),
            HabitError::Forbidden => Self::forbidden(err.to_string()),
            HabitError::AlreadyCompleted
            | HabitError::NotCountBased
            | HabitError::NotPaused
            | HabitError::AlreadyPaused => Self::bad_request(err.to_string()),
            HabitError::Invalid(message) => Self::bad_request(message),
            HabitError::Stale => Self::conflict(err.to_string()),
            HabitError::Storage(message) => Self::internal(message),
        }
    }
}

impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound => Self::not_found(err.to_string()),
            ProfileError::InvalidEmail(_) => Self::bad_request(err.to_string()),
            ProfileError::Invalid(message) => Self::bad_request(message),
            ProfileError::Storage(message) => Self::internal(message),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body").with_details(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request("Invalid path parameter").with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("Invalid query parameters").with_details(rejection.body_text())
    }
}
