//! PostgreSQL implementation of the project and kanban storage port.

use std::collections::HashMap;

use async_trait::async_trait;
use itertools::Itertools;
use sqlx::{PgPool, Postgres, Transaction};
use time::{Date, OffsetDateTime};

use super::decode;
use crate::domain::{
    models::{
        ColumnId, Estimates, InvitationStatus, KanbanColumn, MoveOutcome, NewProject,
        NewProjectTask, Project, ProjectId, ProjectTask, TaskFieldChanges, TaskId, TeamMember,
        UserId,
    },
    ports::outbound::ProjectRepository,
    BoardError,
};

const PROJECT_COLUMNS: &str = "id, name, description, owner_id, status, start_date, end_date, \
     completion_percentage";

const TASK_COLUMNS: &str = "id, title, description, created_by, assigned_to, project_id, \
     column_id, estimated_hours, actual_hours, due_date, priority";

fn db_err(e: sqlx::Error) -> BoardError {
    BoardError::storage(e.to_string())
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    name: String,
    description: Option<String>,
    owner_id: i32,
    status: String,
    start_date: Option<Date>,
    end_date: Option<Date>,
    completion_percentage: i32,
}

#[derive(sqlx::FromRow)]
struct MemberRow {
    project_id: i32,
    user_id: i32,
    role: String,
    invitation_status: String,
    joined_at: OffsetDateTime,
}

impl TryFrom<MemberRow> for TeamMember {
    type Error = BoardError;

    fn try_from(row: MemberRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id.into(),
            role: decode(&row.role, "member role").map_err(BoardError::Storage)?,
            invitation_status: decode(&row.invitation_status, "invitation status")
                .map_err(BoardError::Storage)?,
            joined_at: row.joined_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ColumnRow {
    id: i32,
    project_id: i32,
    name: String,
    position: i32,
    task_ids: Vec<i32>,
}

impl From<ColumnRow> for KanbanColumn {
    fn from(row: ColumnRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            order: row.position,
            task_ids: row.task_ids.into_iter().map(TaskId::new).collect(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: i32,
    title: String,
    description: Option<String>,
    created_by: i32,
    assigned_to: Option<i32>,
    project_id: i32,
    column_id: i32,
    estimated_hours: f64,
    actual_hours: f64,
    due_date: Option<Date>,
    priority: String,
}

impl TryFrom<TaskRow> for ProjectTask {
    type Error = BoardError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id.into(),
            title: row.title,
            description: row.description,
            created_by: row.created_by.into(),
            assigned_to: row.assigned_to.map(UserId::new),
            project_id: row.project_id.into(),
            column_id: row.column_id.into(),
            estimates: Estimates {
                estimated: row.estimated_hours,
                actual: row.actual_hours,
            },
            due_date: row.due_date,
            priority: decode(&row.priority, "priority").map_err(BoardError::Storage)?,
        })
    }
}

fn tasks_from(rows: Vec<TaskRow>) -> Result<Vec<ProjectTask>, BoardError> {
    rows.into_iter().map(ProjectTask::try_from).collect()
}

#[derive(Clone)]
pub struct PostgresBoardStore {
    pool: PgPool,
}

impl PostgresBoardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach members and columns to project rows with one query each.
    async fn hydrate(&self, rows: Vec<ProjectRow>) -> Result<Vec<Project>, BoardError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

        let members = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT project_id, user_id, role, invitation_status, joined_at
            FROM project_members
            WHERE project_id = ANY($1)
            ORDER BY joined_at, user_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let columns = sqlx::query_as::<_, ColumnRow>(
            r#"
            SELECT id, project_id, name, position, task_ids
            FROM kanban_columns
            WHERE project_id = ANY($1)
            ORDER BY position, id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let mut members: HashMap<i32, Vec<MemberRow>> =
            members.into_iter().into_group_map_by(|m| m.project_id);
        let mut columns: HashMap<i32, Vec<ColumnRow>> =
            columns.into_iter().into_group_map_by(|c| c.project_id);

        rows.into_iter()
            .map(|row| -> Result<Project, BoardError> {
                let team_members = members
                    .remove(&row.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(TeamMember::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                let kanban_columns = columns
                    .remove(&row.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(KanbanColumn::from)
                    .collect();
                Ok(Project {
                    id: row.id.into(),
                    name: row.name,
                    description: row.description,
                    owner_id: row.owner_id.into(),
                    status: decode(&row.status, "project status").map_err(BoardError::Storage)?,
                    start_date: row.start_date,
                    end_date: row.end_date,
                    completion_percentage: row.completion_percentage,
                    team_members,
                    kanban_columns,
                })
            })
            .collect()
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, BoardError> {
        self.pool.begin().await.map_err(db_err)
    }
}

#[async_trait]
impl ProjectRepository for PostgresBoardStore {
    async fn create_project(&self, project: &NewProject) -> Result<Project, BoardError> {
        let mut tx = self.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO projects (name, description, owner_id, status, start_date, end_date, completion_percentage)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.owner_id.as_i32())
        .bind(project.status.to_string())
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.completion_percentage)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        for member in &project.team_members {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id, role, invitation_status)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id)
            .bind(member.user_id.as_i32())
            .bind(member.role.to_string())
            .bind(member.invitation_status.to_string())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        for column in &project.kanban_columns {
            sqlx::query("INSERT INTO kanban_columns (project_id, name, position) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(&column.name)
                .bind(column.order)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        self.get_project(ProjectId::new(id))
            .await?
            .ok_or(BoardError::ProjectNotFound)
    }

    async fn get_project(&self, id: ProjectId) -> Result<Option<Project>, BoardError> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_projects_for(&self, user_id: UserId) -> Result<Vec<Project>, BoardError> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            SELECT {PROJECT_COLUMNS} FROM projects
            WHERE owner_id = $1
               OR id IN (SELECT project_id FROM project_members WHERE user_id = $1)
            ORDER BY id DESC
            "#
        ))
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        self.hydrate(rows).await
    }

    async fn update_project(&self, project: &Project) -> Result<Project, BoardError> {
        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = $2, description = $3, status = $4, start_date = $5, end_date = $6,
                completion_percentage = $7
            WHERE id = $1
            "#,
        )
        .bind(project.id.as_i32())
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.status.to_string())
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.completion_percentage)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(BoardError::ProjectNotFound);
        }
        self.get_project(project.id)
            .await?
            .ok_or(BoardError::ProjectNotFound)
    }

    async fn delete_project(&self, id: ProjectId) -> Result<bool, BoardError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_invitation_status(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        status: InvitationStatus,
    ) -> Result<bool, BoardError> {
        let result = sqlx::query(
            "UPDATE project_members SET invitation_status = $3 WHERE project_id = $1 AND user_id = $2",
        )
        .bind(project_id.as_i32())
        .bind(user_id.as_i32())
        .bind(status.to_string())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> Result<bool, BoardError> {
        let mut tx = self.begin().await?;

        let removed = sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
            .bind(project_id.as_i32())
            .bind(user_id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();
        if removed == 0 {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE project_tasks SET assigned_to = NULL WHERE project_id = $1 AND assigned_to = $2",
        )
        .bind(project_id.as_i32())
        .bind(user_id.as_i32())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(true)
    }

    async fn create_task(&self, task: &NewProjectTask) -> Result<ProjectTask, BoardError> {
        let mut tx = self.begin().await?;

        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            INSERT INTO project_tasks (title, description, created_by, assigned_to, project_id, column_id,
                                       estimated_hours, actual_hours, due_date, priority)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.created_by.as_i32())
        .bind(task.assigned_to.map(|u| u.as_i32()))
        .bind(task.project_id.as_i32())
        .bind(task.column_id.as_i32())
        .bind(task.estimates.estimated)
        .bind(task.estimates.actual)
        .bind(task.due_date)
        .bind(task.priority.to_string())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err)?;

        let appended = sqlx::query(
            "UPDATE kanban_columns SET task_ids = array_append(task_ids, $1) WHERE id = $2 AND project_id = $3",
        )
        .bind(row.id)
        .bind(task.column_id.as_i32())
        .bind(task.project_id.as_i32())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;
        if appended.rows_affected() == 0 {
            return Err(BoardError::ColumnNotFound);
        }

        tx.commit().await.map_err(db_err)?;
        row.try_into()
    }

    async fn get_task(&self, id: TaskId) -> Result<Option<ProjectTask>, BoardError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM project_tasks WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(ProjectTask::try_from).transpose()
    }

    async fn list_tasks(&self, project_id: ProjectId) -> Result<Vec<ProjectTask>, BoardError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM project_tasks WHERE project_id = $1 ORDER BY id"
        ))
        .bind(project_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        tasks_from(rows)
    }

    async fn list_assigned_tasks(&self, user_id: UserId) -> Result<Vec<ProjectTask>, BoardError> {
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM project_tasks WHERE assigned_to = $1 ORDER BY due_date NULLS LAST, id"
        ))
        .bind(user_id.as_i32())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        tasks_from(rows)
    }

    async fn update_task_fields(
        &self,
        id: TaskId,
        changes: &TaskFieldChanges,
    ) -> Result<Option<ProjectTask>, BoardError> {
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            r#"
            UPDATE project_tasks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                assigned_to = COALESCE($4, assigned_to),
                estimated_hours = COALESCE($5, estimated_hours),
                actual_hours = COALESCE($6, actual_hours),
                due_date = COALESCE($7, due_date),
                priority = COALESCE($8, priority)
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.assigned_to.map(|u| u.as_i32()))
        .bind(changes.estimates.map(|e| e.estimated))
        .bind(changes.estimates.map(|e| e.actual))
        .bind(changes.due_date)
        .bind(changes.priority.map(|p| p.to_string()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(ProjectTask::try_from).transpose()
    }

    async fn move_task(
        &self,
        project_id: ProjectId,
        task_id: TaskId,
        from: ColumnId,
        to: ColumnId,
    ) -> Result<MoveOutcome, BoardError> {
        let mut tx = self.begin().await?;

        let swapped = sqlx::query(
            "UPDATE project_tasks SET column_id = $3 WHERE id = $1 AND column_id = $2 AND project_id = $4",
        )
        .bind(task_id.as_i32())
        .bind(from.as_i32())
        .bind(to.as_i32())
        .bind(project_id.as_i32())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?
        .rows_affected();

        if swapped == 0 {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM project_tasks WHERE id = $1)")
                    .bind(task_id.as_i32())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(db_err)?;
            return if exists {
                Ok(MoveOutcome::Stale)
            } else {
                Err(BoardError::TaskNotFound)
            };
        }

        sqlx::query(
            "UPDATE kanban_columns SET task_ids = array_remove(task_ids, $1) WHERE project_id = $2",
        )
        .bind(task_id.as_i32())
        .bind(project_id.as_i32())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query("UPDATE kanban_columns SET task_ids = array_append(task_ids, $1) WHERE id = $2")
            .bind(task_id.as_i32())
            .bind(to.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(MoveOutcome::Moved)
    }

    async fn delete_task(&self, task: &ProjectTask) -> Result<bool, BoardError> {
        let mut tx = self.begin().await?;

        sqlx::query(
            "UPDATE kanban_columns SET task_ids = array_remove(task_ids, $1) WHERE project_id = $2",
        )
        .bind(task.id.as_i32())
        .bind(task.project_id.as_i32())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let deleted = sqlx::query("DELETE FROM project_tasks WHERE id = $1")
            .bind(task.id.as_i32())
            .execute(&mut *tx)
            .await
            .map_err(db_err)?
            .rows_affected();

        tx.commit().await.map_err(db_err)?;
        Ok(deleted > 0)
    }
}
