use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::domain::{
    models::{
        ColumnId, InvitationStatus, KanbanColumn, MoveOutcome, NewProject, NewProjectTask,
        Project, ProjectId, ProjectTask, TaskFieldChanges, TaskId, TeamMember, UserId,
    },
    ports::outbound::ProjectRepository,
    BoardError,
};

#[derive(Default)]
struct BoardTables {
    next_id: i32,
    projects: Vec<Project>,
    tasks: Vec<ProjectTask>,
}

impl BoardTables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }
}

#[derive(Clone, Default)]
pub struct MemoryBoardStore {
    tables: Arc<RwLock<BoardTables>>,
}

impl MemoryBoardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many columns of the project list `task_id`.
    pub fn column_listings(&self, project_id: ProjectId, task_id: TaskId) -> usize {
        let tables = self.tables.read().unwrap();
        tables
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .map_or(0, |p| p.columns_holding(task_id).len())
    }

    pub fn project(&self, project_id: ProjectId) -> Option<Project> {
        let tables = self.tables.read().unwrap();
        tables.projects.iter().find(|p| p.id == project_id).cloned()
    }

    /// Move a task behind the service's back, as a concurrent request would.
    pub fn force_column(&self, task_id: TaskId, column_id: ColumnId) {
        let mut tables = self.tables.write().unwrap();
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == task_id) else {
            return;
        };
        task.column_id = column_id;
        let project_id = task.project_id;
        if let Some(project) = tables.project_mut(project_id) {
            for column in &mut project.kanban_columns {
                column.task_ids.retain(|id| *id != task_id);
                if column.id == column_id {
                    column.task_ids.push(task_id);
                }
            }
        }
    }
}

#[async_trait]
impl ProjectRepository for MemoryBoardStore {
    async fn create_project(&self, project: &NewProject) -> Result<Project, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let id = ProjectId::new(tables.next_id());
        let kanban_columns = project
            .kanban_columns
            .iter()
            .map(|c| KanbanColumn {
                id: ColumnId::new(tables.next_id()),
                name: c.name.clone(),
                order: c.order,
                task_ids: vec![],
            })
            .collect();
        let created = Project {
            id,
            name: project.name.clone(),
            description: project.description.clone(),
            owner_id: project.owner_id,
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
            completion_percentage: project.completion_percentage,
            team_members: project
                .team_members
                .iter()
                .map(|m| TeamMember {
                    user_id: m.user_id,
                    role: m.role,
                    invitation_status: m.invitation_status,
                    joined_at: OffsetDateTime::UNIX_EPOCH,
                })
                .collect(),
            kanban_columns,
        };
        tables.projects.push(created.clone());
        Ok(created)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, BoardError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects_for(&self, user_id: UserId) -> Result<Vec<Project>, BoardError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .projects
            .iter()
            .filter(|p| p.has_access(user_id))
            .cloned()
            .collect())
    }

    async fn update_project(&self, project: &Project) -> Result<Project, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let stored = tables
            .project_mut(project.id)
            .ok_or(BoardError::ProjectNotFound)?;
        stored.name = project.name.clone();
        stored.description = project.description.clone();
        stored.status = project.status;
        stored.start_date = project.start_date;
        stored.end_date = project.end_date;
        stored.completion_percentage = project.completion_percentage;
        Ok(stored.clone())
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        tables.tasks.retain(|t| t.project_id != id);
        Ok(tables.projects.len() != before)
    }

    async fn set_invitation_status(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        status: InvitationStatus,
    ) -> Result<bool, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let member = tables
            .project_mut(project_id)
            .and_then(|p| p.team_members.iter_mut().find(|m| m.user_id == user_id));
        Ok(match member {
            Some(member) => {
                member.invitation_status = status;
                true
            }
            None => false,
        })
    }

    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<bool, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let Some(project) = tables.project_mut(project_id) else {
            return Ok(false);
        };
        let before = project.team_members.len();
        project.team_members.retain(|m| m.user_id != user_id);
        if project.team_members.len() == before {
            return Ok(false);
        }
        for task in tables
            .tasks
            .iter_mut()
            .filter(|t| t.project_id == project_id && t.assigned_to == Some(user_id))
        {
            task.assigned_to = None;
        }
        Ok(true)
    }

    async fn create_task(&self, task: &NewProjectTask) -> Result<ProjectTask, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let id = TaskId::new(tables.next_id());
        let column = tables
            .project_mut(task.project_id)
            .ok_or(BoardError::ProjectNotFound)?
            .kanban_columns
            .iter_mut()
            .find(|c| c.id == task.column_id)
            .ok_or(BoardError::ColumnNotFound)?;
        column.task_ids.push(id);

        let created = ProjectTask {
            id,
            title: task.title.clone(),
            description: task.description.clone(),
            created_by: task.created_by,
            assigned_to: task.assigned_to,
            project_id: task.project_id,
            column_id: task.column_id,
            estimates: task.estimates,
            due_date: task.due_date,
            priority: task.priority,
        };
        tables.tasks.push(created.clone());
        Ok(created)
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<ProjectTask>, BoardError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<ProjectTask>, BoardError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_assigned_tasks(&self, user_id: UserId) -> Result<Vec<ProjectTask>, BoardError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.assigned_to == Some(user_id))
            .cloned()
            .collect())
    }

    async fn update_task_fields(
        &self,
        id: TaskId,
        changes: &TaskFieldChanges,
    ) -> Result<Option<ProjectTask>, BoardError> {
        let mut tables = self.tables.write().unwrap();
        Ok(tables.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            changes.apply(task);
            task.clone()
        }))
    }

    async fn move_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
    ) -> Result<MoveOutcome, BoardError> {
        let mut tables = self.tables.write().unwrap();
        let Some(task) = tables.tasks.iter_mut().find(|t| t.id == task_id) else {
            return Err(BoardError::TaskNotFound);
        };
        if task.column_id != from {
            return Ok(MoveOutcome::Stale);
        }
        task.column_id = to;

        let project = tables
            .project_mut(project_id)
            .ok_or(BoardError::ProjectNotFound)?;
        for column in &mut project.kanban_columns {
            column.task_ids.retain(|id| *id != task_id);
            if column.id == to {
                column.task_ids.push(task_id);
            }
        }
        Ok(MoveOutcome::Moved)
    }

    async fn delete_task(&self, task: &ProjectTask) -> Result<bool, BoardError> {
        let mut tables = self.tables.write().unwrap();
        if let Some(project) = tables.project_mut(task.project_id) {
            for column in &mut project.kanban_columns {
                column.task_ids.retain(|id| *id != task.id);
            }
        }
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != task.id);
        Ok(tables.tasks.len() != before)
    }
}
