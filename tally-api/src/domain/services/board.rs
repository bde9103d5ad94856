use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use futures::future::join_all;
use itertools::Itertools;
use tracing::{debug, error};

use crate::domain::{
    models::{
        ColumnId, CreateProjectRequest, CreateTaskRequest, InvitationStatus, KanbanColumn,
        MoveOutcome, NewProject, NewProjectTask, NewTeamMember, NotificationPayload, Priority,
        Project, ProjectId, ProjectStatus, ProjectTask, TaskFieldChanges, TaskFilter, TaskId,
        UpdateProjectRequest, UpdateTaskRequest, UserId,
    },
    ports::{
        inbound::BoardService,
        outbound::{Clock, Notifier, ProjectRepository, UserRepository},
    },
    BoardError,
};

/// Attempts at a column move before giving up on a contended task.
const MAX_MOVE_ATTEMPTS: usize = 3;

fn validate_completion(pct: i32) -> Result<(), BoardError> {
    if !(0..=100).contains(&pct) {
        return Err(BoardError::invalid(
            "Completion percentage must be between 0 and 100",
        ));
    }
    Ok(())
}

fn ensure_access(project: &Project, user_id: UserId) -> Result<(), BoardError> {
    if !project.has_access(user_id) {
        return Err(BoardError::forbidden(
            "You don't have access to this project",
        ));
    }
    Ok(())
}

fn ensure_owner(project: &Project, user_id: UserId) -> Result<(), BoardError> {
    if !project.is_owner(user_id) {
        return Err(BoardError::forbidden(
            "Only the project owner can perform this action",
        ));
    }
    Ok(())
}

fn ensure_assignable(project: &Project, assignee: Option<UserId>) -> Result<(), BoardError> {
    match assignee {
        Some(user_id) if !project.is_member(user_id) => Err(BoardError::AssigneeNotMember),
        _ => Ok(()),
    }
}

/// Projects and their kanban boards.
///
/// A task's `column_id` and the column task lists are always written
/// together by the repository; this service decides when a move is needed
/// and who hears about it.
pub struct BoardServiceImpl<P, U> {
    projects: Arc<P>,
    users: Arc<U>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl<P: ProjectRepository, U: UserRepository> BoardServiceImpl<P, U> {
    pub fn new(
        projects: Arc<P>,
        users: Arc<U>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            projects,
            users,
            notifier,
            clock,
        }
    }

    async fn load_project(&self, id: ProjectId) -> Result<Project, BoardError> {
        self.projects
            .get_project(id)
            .await?
            .ok_or(BoardError::ProjectNotFound)
    }

    async fn load_task(&self, id: TaskId) -> Result<ProjectTask, BoardError> {
        self.projects
            .get_task(id)
            .await?
            .ok_or(BoardError::TaskNotFound)
    }

    /// A task together with its project, checked for the caller's access.
    async fn task_in_context(
        &self,
        user_id: UserId,
        id: TaskId,
    ) -> Result<(ProjectTask, Project), BoardError> {
        let task = self.load_task(id).await?;
        let project = self.load_project(task.project_id).await?;
        ensure_access(&project, user_id)?;
        Ok((task, project))
    }

    async fn username(&self, user_id: UserId) -> String {
        match self.users.get(user_id).await {
            Ok(Some(profile)) => profile.username,
            _ => format!("user {user_id}"),
        }
    }

    /// Deliver a notification to a user with a profile. Users without one
    /// have no address and are skipped.
    async fn notify_user(&self, recipient: UserId, payload: NotificationPayload) {
        match self.users.get(recipient).await {
            Ok(Some(profile)) => self.notifier.notify(&profile.email, payload).await,
            Ok(None) => debug!(%recipient, "no profile, skipping notification"),
            Err(e) => error!("failed to look up notification recipient {recipient}: {e}"),
        }
    }

    /// Move `task` to `to`, retrying when a concurrent move wins the
    /// compare-and-swap. A task already in `to` is left as is.
    async fn move_within(
        &self,
        actor: UserId,
        project: &Project,
        mut task: ProjectTask,
        to: ColumnId,
    ) -> Result<ProjectTask, BoardError> {
        let target = project.column(to).ok_or(BoardError::ColumnNotFound)?;

        for attempt in 1..=MAX_MOVE_ATTEMPTS {
            if task.column_id == to {
                return Ok(task);
            }
            match self
                .projects
                .move_task(project.id, task.id, task.column_id, to)
                .await?
            {
                MoveOutcome::Moved => {
                    debug!(task_id = %task.id, from = %task.column_id, %to, "moved task");
                    task.column_id = to;
                    if project.is_terminal_column(to) {
                        let payload = NotificationPayload::TaskReachedFinalColumn {
                            project_id: project.id,
                            project_name: project.name.clone(),
                            owner_id: project.owner_id,
                            moved_by: self.username(actor).await,
                            task_id: task.id,
                            task_title: task.title.clone(),
                            column_name: target.name.clone(),
                        };
                        self.notify_user(project.owner_id, payload).await;
                    }
                    return Ok(task);
                }
                MoveOutcome::Stale => {
                    debug!(task_id = %task.id, attempt, "task moved concurrently, reloading");
                    task = self.load_task(task.id).await?;
                }
            }
        }
        Err(BoardError::ConcurrentMove)
    }
}

#[async_trait]
impl<P: ProjectRepository, U: UserRepository> BoardService for BoardServiceImpl<P, U> {
    async fn create_project(
        &self,
        owner: UserId,
        request: CreateProjectRequest,
    ) -> Result<Project, BoardError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(BoardError::invalid("Project name is required"));
        }
        let completion_percentage = request.completion_percentage.unwrap_or(0);
        validate_completion(completion_percentage)?;
        if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
            if end < start {
                return Err(BoardError::invalid("End date cannot be before start date"));
            }
        }
        if request.kanban_columns.iter().any(|c| c.name.trim().is_empty()) {
            return Err(BoardError::invalid("Column names cannot be empty"));
        }

        let mut seen = HashSet::new();
        let team_members: Vec<NewTeamMember> = request
            .team_members
            .into_iter()
            .filter(|m| seen.insert(m.user_id))
            .map(|m| NewTeamMember {
                user_id: m.user_id,
                role: m.role,
                invitation_status: if m.user_id == owner {
                    InvitationStatus::Accepted
                } else {
                    InvitationStatus::Pending
                },
            })
            .collect();

        let project = self
            .projects
            .create_project(&NewProject {
                name: name.to_string(),
                description: request.description,
                owner_id: owner,
                status: request.status.unwrap_or(ProjectStatus::NotStarted),
                start_date: request.start_date,
                end_date: request.end_date,
                completion_percentage,
                team_members,
                kanban_columns: request.kanban_columns,
            })
            .await?;

        let invited_by = self.username(owner).await;
        let invitations = project
            .team_members
            .iter()
            .filter(|m| m.user_id != owner)
            .map(|member| {
                let payload = NotificationPayload::ProjectInvitation {
                    project_id: project.id,
                    project_name: project.name.clone(),
                    invited_by: invited_by.clone(),
                    role: member.role,
                };
                self.notify_user(member.user_id, payload)
            });
        join_all(invitations).await;

        Ok(project)
    }

    async fn list_projects(&self, user_id: UserId) -> Result<Vec<Project>, BoardError> {
        self.projects.list_projects_for(user_id).await
    }

    async fn get_project(&self, user_id: UserId, id: ProjectId) -> Result<Project, BoardError> {
        let project = self.load_project(id).await?;
        ensure_access(&project, user_id)?;
        Ok(project)
    }

    async fn update_project(
        &self,
        user_id: UserId,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> Result<Project, BoardError> {
        let mut project = self.load_project(id).await?;
        ensure_owner(&project, user_id)?;

        if let Some(name) = request.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(BoardError::invalid("Project name is required"));
            }
            project.name = name.to_string();
        }
        if let Some(description) = request.description {
            project.description = Some(description);
        }
        if let Some(status) = request.status {
            project.status = status;
        }
        if let Some(start) = request.start_date {
            project.start_date = Some(start);
        }
        if let Some(end) = request.end_date {
            project.end_date = Some(end);
        }
        if let Some(pct) = request.completion_percentage {
            validate_completion(pct)?;
            project.completion_percentage = pct;
        }
        if let (Some(start), Some(end)) = (project.start_date, project.end_date) {
            if end < start {
                return Err(BoardError::invalid("End date cannot be before start date"));
            }
        }

        self.projects.update_project(&project).await
    }

    async fn delete_project(&self, user_id: UserId, id: ProjectId) -> Result<(), BoardError> {
        let project = self.load_project(id).await?;
        ensure_owner(&project, user_id)?;
        if !self.projects.delete_project(id).await? {
            return Err(BoardError::ProjectNotFound);
        }
        Ok(())
    }

    async fn respond_to_invitation(
        &self,
        user_id: UserId,
        id: ProjectId,
        status: InvitationStatus,
    ) -> Result<Project, BoardError> {
        if status == InvitationStatus::Pending {
            return Err(BoardError::invalid(
                "Invalid invitation status. Must be 'accepted' or 'declined'",
            ));
        }
        let project = self
            .projects
            .get_project(id)
            .await?
            .ok_or(BoardError::NotInvited)?;
        if !project.is_member(user_id)
            || !self.projects.set_invitation_status(id, user_id, status).await?
        {
            return Err(BoardError::NotInvited);
        }

        let payload = NotificationPayload::InvitationResponse {
            project_id: project.id,
            project_name: project.name.clone(),
            member: self.username(user_id).await,
            status,
        };
        self.notify_user(project.owner_id, payload).await;

        self.load_project(id).await
    }

    async fn remove_team_member(
        &self,
        user_id: UserId,
        id: ProjectId,
        member: UserId,
    ) -> Result<Project, BoardError> {
        let project = self.load_project(id).await?;
        ensure_owner(&project, user_id)?;
        if !project.is_member(member) || !self.projects.remove_member(id, member).await? {
            return Err(BoardError::NotAMember);
        }
        self.load_project(id).await
    }

    async fn create_task(
        &self,
        user_id: UserId,
        request: CreateTaskRequest,
    ) -> Result<ProjectTask, BoardError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(BoardError::invalid("Task title is required"));
        }
        let project = self.load_project(request.project_id).await?;
        ensure_access(&project, user_id)?;
        if project.column(request.column_id).is_none() {
            return Err(BoardError::ColumnNotFound);
        }
        ensure_assignable(&project, request.assigned_to)?;

        self.projects
            .create_task(&NewProjectTask {
                title: title.to_string(),
                description: request.description,
                created_by: user_id,
                assigned_to: request.assigned_to,
                project_id: project.id,
                column_id: request.column_id,
                estimates: request.estimates.unwrap_or_default(),
                due_date: request.due_date,
                priority: request.priority.unwrap_or(Priority::Medium),
            })
            .await
    }

    async fn get_task(&self, user_id: UserId, id: TaskId) -> Result<ProjectTask, BoardError> {
        let (task, _) = self.task_in_context(user_id, id).await?;
        Ok(task)
    }

    async fn update_task(
        &self,
        user_id: UserId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> Result<ProjectTask, BoardError> {
        let (_, project) = self.task_in_context(user_id, id).await?;
        ensure_assignable(&project, request.assigned_to)?;
        if let Some(column_id) = request.column_id {
            if project.column(column_id).is_none() {
                return Err(BoardError::ColumnNotFound);
            }
        }
        if request.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::invalid("Task title cannot be empty"));
        }

        let changes = TaskFieldChanges {
            title: request.title.map(|t| t.trim().to_string()),
            description: request.description,
            assigned_to: request.assigned_to,
            estimates: request.estimates,
            due_date: request.due_date,
            priority: request.priority,
        };
        let task = self
            .projects
            .update_task_fields(id, &changes)
            .await?
            .ok_or(BoardError::TaskNotFound)?;

        match request.column_id {
            Some(column_id) => self.move_within(user_id, &project, task, column_id).await,
            None => Ok(task),
        }
    }

    async fn move_task(
        &self,
        user_id: UserId,
        id: TaskId,
        to: ColumnId,
    ) -> Result<ProjectTask, BoardError> {
        let (task, project) = self.task_in_context(user_id, id).await?;
        self.move_within(user_id, &project, task, to).await
    }

    async fn delete_task(&self, user_id: UserId, id: TaskId) -> Result<(), BoardError> {
        let (task, _) = self.task_in_context(user_id, id).await?;
        if !self.projects.delete_task(&task).await? {
            return Err(BoardError::TaskNotFound);
        }
        Ok(())
    }

    async fn list_project_tasks(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        filter: TaskFilter,
    ) -> Result<Vec<ProjectTask>, BoardError> {
        let project = self.load_project(project_id).await?;
        ensure_access(&project, user_id)?;
        let today = self.clock.today();

        let tasks = self
            .projects
            .list_tasks(project_id)
            .await?
            .into_iter()
            .filter(|t| filter.priority.map_or(true, |p| t.priority == p))
            .filter(|t| filter.assigned_to.map_or(true, |u| t.assigned_to == Some(u)))
            .filter(|t| filter.due.map_or(true, |d| d.matches(t.due_date, today)))
            .sorted_by_key(|t| (t.priority, t.due_date.is_none(), t.due_date))
            .collect();
        Ok(tasks)
    }

    async fn list_column_tasks(
        &self,
        user_id: UserId,
        project_id: ProjectId,
        column_id: ColumnId,
    ) -> Result<(KanbanColumn, Vec<ProjectTask>), BoardError> {
        let project = self.load_project(project_id).await?;
        ensure_access(&project, user_id)?;
        let column = project
            .column(column_id)
            .cloned()
            .ok_or(BoardError::ColumnNotFound)?;

        let mut tasks = self.projects.list_tasks(project_id).await?;
        tasks.retain(|t| column.task_ids.contains(&t.id));
        tasks.sort_by_key(|t| column.task_ids.iter().position(|id| *id == t.id));
        Ok((column, tasks))
    }

    async fn list_assigned_tasks(&self, user_id: UserId) -> Result<Vec<ProjectTask>, BoardError> {
        self.projects.list_assigned_tasks(user_id).await
    }
}
