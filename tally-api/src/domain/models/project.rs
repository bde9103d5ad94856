use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{Date, OffsetDateTime};

use super::{ColumnId, ProjectId, TaskId, UserId};
use crate::utils::date_format::iso_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
    Viewer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ProjectStatus {
    #[serde(rename = "Not Started")]
    #[strum(serialize = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    #[strum(serialize = "In Progress")]
    InProgress,
    Completed,
    #[serde(rename = "On Hold")]
    #[strum(serialize = "On Hold")]
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub user_id: UserId,
    pub role: MemberRole,
    pub invitation_status: InvitationStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub joined_at: OffsetDateTime,
}

/// A board column. `task_ids` is the column side of the task/column
/// dual-write: every task of the project appears in exactly one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumn {
    pub id: ColumnId,
    pub name: String,
    pub order: i32,
    pub task_ids: Vec<TaskId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub status: ProjectStatus,
    #[serde(with = "iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(with = "iso_date::option")]
    pub end_date: Option<Date>,
    pub completion_percentage: i32,
    pub team_members: Vec<TeamMember>,
    pub kanban_columns: Vec<KanbanColumn>,
}

impl Project {
    pub fn is_owner(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    pub fn is_member(&self, user_id: UserId) -> bool {
        self.team_members.iter().any(|m| m.user_id == user_id)
    }

    /// Owners and listed team members may work on the board.
    pub fn has_access(&self, user_id: UserId) -> bool {
        self.is_owner(user_id) || self.is_member(user_id)
    }

    pub fn column(&self, column_id: ColumnId) -> Option<&KanbanColumn> {
        self.kanban_columns.iter().find(|c| c.id == column_id)
    }

    /// The column with the highest `order`. Ties resolve to the first column
    /// in board order.
    pub fn terminal_column(&self) -> Option<&KanbanColumn> {
        self.kanban_columns
            .iter()
            .fold(None, |best: Option<&KanbanColumn>, column| match best {
                Some(b) if b.order >= column.order => Some(b),
                _ => Some(column),
            })
    }

    pub fn is_terminal_column(&self, column_id: ColumnId) -> bool {
        self.terminal_column().is_some_and(|c| c.id == column_id)
    }

    /// Columns currently listing `task_id`.
    pub fn columns_holding(&self, task_id: TaskId) -> Vec<ColumnId> {
        self.kanban_columns
            .iter()
            .filter(|c| c.task_ids.contains(&task_id))
            .map(|c| c.id)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct NewTeamMember {
    pub user_id: UserId,
    pub role: MemberRole,
    pub invitation_status: InvitationStatus,
}

#[derive(Debug, Clone)]
pub struct NewKanbanColumn {
    pub name: String,
    pub order: i32,
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: UserId,
    pub status: ProjectStatus,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub completion_percentage: i32,
    pub team_members: Vec<NewTeamMember>,
    pub kanban_columns: Vec<NewKanbanColumn>,
}

#[derive(Debug, Clone)]
pub struct TeamMemberRequest {
    pub user_id: UserId,
    pub role: MemberRole,
}

#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub completion_percentage: Option<i32>,
    pub team_members: Vec<TeamMemberRequest>,
    pub kanban_columns: Vec<NewKanbanColumn>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub completion_percentage: Option<i32>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString,
)]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Estimates {
    /// Hours.
    pub estimated: f64,
    /// Hours.
    pub actual: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTask {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
    pub estimates: Estimates,
    #[serde(with = "iso_date::option")]
    pub due_date: Option<Date>,
    pub priority: Priority,
}

#[derive(Debug, Clone)]
pub struct NewProjectTask {
    pub title: String,
    pub description: Option<String>,
    pub created_by: UserId,
    pub assigned_to: Option<UserId>,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
    pub estimates: Estimates,
    pub due_date: Option<Date>,
    pub priority: Priority,
}

#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub assigned_to: Option<UserId>,
    pub project_id: ProjectId,
    pub column_id: ColumnId,
    pub estimates: Option<Estimates>,
    pub due_date: Option<Date>,
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<UserId>,
    pub column_id: Option<ColumnId>,
    pub estimates: Option<Estimates>,
    pub due_date: Option<Date>,
    pub priority: Option<Priority>,
}

/// Field changes persisted by a task update. Column membership is never
/// changed through this path.
#[derive(Debug, Clone, Default)]
pub struct TaskFieldChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<UserId>,
    pub estimates: Option<Estimates>,
    pub due_date: Option<Date>,
    pub priority: Option<Priority>,
}

impl TaskFieldChanges {
    pub fn apply(&self, task: &mut ProjectTask) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = Some(description.clone());
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = Some(assigned_to);
        }
        if let Some(estimates) = self.estimates {
            task.estimates = estimates;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueFilter {
    Overdue,
    Today,
    Week,
    On(Date),
}

impl DueFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "overdue" => Some(Self::Overdue),
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            other => crate::utils::date_format::parse_date(other).map(Self::On),
        }
    }

    pub fn matches(&self, due_date: Option<Date>, today: Date) -> bool {
        let Some(due) = due_date else {
            return false;
        };
        match self {
            Self::Overdue => due < today,
            Self::Today => due == today,
            Self::Week => due >= today && due < today + time::Duration::days(7),
            Self::On(date) => due == *date,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub priority: Option<Priority>,
    pub assigned_to: Option<UserId>,
    pub due: Option<DueFilter>,
}

/// Outcome of a compare-and-swap column move against storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// The task was no longer in the expected source column.
    Stale,
}
