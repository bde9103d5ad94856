use super::models::EmailError;
use thiserror::Error;

/// Errors raised by categories, budgets, expenses, EMIs, investments and the
/// financial overview.
#[derive(Debug, Error)]
pub enum FinanceError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Storage(String),
}

impl FinanceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Errors raised by projects and the kanban board.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Column not found in project")]
    ColumnNotFound,
    #[error("Task not found")]
    TaskNotFound,
    #[error("Assigned user is not a member of the project")]
    AssigneeNotMember,
    #[error("User is not a team member of this project")]
    NotAMember,
    #[error("Project not found or you are not invited to this project")]
    NotInvited,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Invalid(String),
    #[error("task was moved concurrently, please retry")]
    ConcurrentMove,
    #[error("{0}")]
    Storage(String),
}

impl BoardError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Errors raised by the habit tracker.
#[derive(Debug, Error)]
pub enum HabitError {
    #[error("Habit not found")]
    NotFound,
    #[error("Not authorized to access this habit")]
    Forbidden,
    #[error("Habit already completed for this day")]
    AlreadyCompleted,
    #[error("No completion log found for this date")]
    LogNotFound,
    #[error("This is not a count-based habit")]
    NotCountBased,
    #[error("Habit is not paused")]
    NotPaused,
    #[error("Habit is already paused")]
    AlreadyPaused,
    #[error("{0}")]
    Invalid(String),
    #[error("habit was modified concurrently, please retry")]
    Stale,
    #[error("{0}")]
    Storage(String),
}

impl HabitError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Errors raised while reading or writing user profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("User profile not found")]
    NotFound,
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    Storage(String),
}

impl ProfileError {
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
