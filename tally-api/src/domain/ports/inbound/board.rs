use async_trait::async_trait;

use crate::domain::{
    models::{
        ColumnId, CreateProjectRequest, CreateTaskRequest, InvitationStatus, KanbanColumn,
        Project, ProjectId, ProjectTask, TaskFilter, TaskId, UpdateProjectRequest,
        UpdateTaskRequest, UserId,
    },
    BoardError,
};

/// Projects, their members and the kanban board.
#[async_trait]
pub trait BoardService: Send + Sync + 'static {
    async fn create_project(
        &self,
        owner: UserId,
        request: CreateProjectRequest,
    ) -> Result<Project, BoardError>;

    async fn list_projects(&self, user_id: UserId) -> Result<Vec<Project>, BoardError>;

    async fn get_project(&self, user_id: UserId, id: ProjectId) -> Result<Project, BoardError>;

    async fn update_project(
        &self,
        user_id: UserId,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> Result<Project, BoardError>;

    async fn delete_project(&self, user_id: UserId, id: ProjectId) -> Result<(), BoardError>;

    /// Accept or decline a pending invitation.
    async fn respond_to_invitation(
        &self,
        user_id: UserId,
        id: ProjectId,
        status: InvitationStatus,
    ) -> Result<Project, BoardError>;

    async fn remove_team_member(
        &self,
        user_id: UserId,
        id: ProjectId,
        member: UserId,
    ) -> Result<Project, BoardError>;

    async fn create_task(
        &self,
        user_id: UserId,
        request: CreateTaskRequest,
    ) -> Result<ProjectTask, BoardError>;

    async fn get_task(&self, user_id: UserId, id: TaskId) -> Result<ProjectTask, BoardError>;

    /// Update task fields. A column change is carried out as a move.
    async fn update_task(
        &self,
        user_id: UserId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> Result<ProjectTask, BoardError>;

    /// Move a task to another column. Moving to the current column succeeds
    /// without changing anything.
    async fn move_task(
        &self,
        user_id: UserId,
        id: TaskId,
        to: ColumnId,
    ) -> Result<ProjectTask, BoardError>;

    async fn delete_task(&self, user_id: UserId, id: TaskId) -> Result<(), BoardError>;

    /// Tasks of a project, High priority first, then by due date.
    async fn list_project_tasks(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        filter: TaskFilter,
    ) -> Result<Vec<ProjectTask>, BoardError>;

    /// A column together with its tasks in board order.
    async fn list_column_tasks(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> Result<(KanbanColumn, Vec<ProjectTask>), BoardError>;

    async fn list_assigned_tasks(&self, user_id: UserId) -> Result<Vec<ProjectTask>, BoardError>;
}
