mod envelope;
mod error;
mod extract;

pub(crate) mod budgets;
pub(crate) mod categories;
pub(crate) mod emis;
pub(crate) mod expenses;
pub(crate) mod habits;
pub(crate) mod health;
pub(crate) mod investments;
pub(crate) mod overview;
pub(crate) mod project_tasks;
pub(crate) mod projects;
pub(crate) mod users;

pub(crate) use envelope::ApiSuccess;
pub(crate) use error::ApiError;
