//! Storage port for projects and their kanban boards.

use async_trait::async_trait;

use crate::domain::{
    models::{
        ColumnId, InvitationStatus, MoveOutcome, NewProject, NewProjectTask, Project, ProjectId,
        ProjectTask, TaskFieldChanges, TaskId, UserId,
    },
    BoardError,
};

/// Each write that touches both a task and its column list is a single
/// storage transaction.
#[async_trait]
pub trait ProjectRepository: Send + Sync + 'static {
    async fn create_project(&self, project: &NewProject) -> Result<Project, BoardError>;

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, BoardError>;

    /// Projects the user owns or is listed on.
    async fn list_projects_for(&self, user_id: UserId) -> Result<Vec<Project>, BoardError>;

    /// Persist the project's scalar fields. Members and columns are untouched.
    async fn update_project(&self, project: &Project) -> Result<Project, BoardError>;

    /// Delete a project together with its columns and tasks.
    async fn delete_project(&self, id: ProjectId) -> Result<bool, BoardError>;

    async fn set_invitation_status(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        status: InvitationStatus,
    ) -> Result<bool, BoardError>;

    /// Remove a member and clear them as assignee on the project's tasks.
    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<bool, BoardError>;

    /// Insert the task and append its id to its column.
    async fn create_task(&self, task: &NewProjectTask) -> Result<ProjectTask, BoardError>;

    async fn get_task(&self, id: TaskId) -> Result<Option<ProjectTask>, BoardError>;

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<ProjectTask>, BoardError>;

    async fn list_assigned_tasks(&self, user_id: UserId) -> Result<Vec<ProjectTask>, BoardError>;

    async fn update_task_fields(
        &self,
        id: TaskId,
        changes: &TaskFieldChanges,
    ) -> Result<Option<ProjectTask>, BoardError>;

    /// Move a task from `from` to `to` if it is still in `from`.
    ///
    /// The task id is removed from every column of the project before being
    /// appended to `to`, so it can never be listed twice.
    async fn move_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
    ) -> Result<MoveOutcome, BoardError>;

    /// Remove the task id from its project's columns and delete the task.
    async fn delete_task(&self, task: &ProjectTask) -> Result<bool, BoardError>;
}
