use serde::Serialize;

use super::{InvitationStatus, MemberRole, ProjectId, TaskId, UserId};

/// Events delivered to a user's inbox through the notification sender.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "template", rename_all = "snake_case")]
pub enum NotificationPayload {
    #[serde(rename_all = "camelCase")]
    ProjectInvitation {
        project_id: ProjectId,
        project_name: String,
        invited_by: String,
        role: MemberRole,
    },
    #[serde(rename_all = "camelCase")]
    InvitationResponse {
        project_id: ProjectId,
        project_name: String,
        member: String,
        status: InvitationStatus,
    },
    #[serde(rename_all = "camelCase")]
    TaskReachedFinalColumn {
        project_id: ProjectId,
        project_name: String,
        owner_id: UserId,
        moved_by: String,
        task_id: TaskId,
        task_title: String,
        column_name: String,
    },
}

impl NotificationPayload {
    pub fn subject(&self) -> String {
        match self {
            Self::ProjectInvitation { project_name, .. } => {
                format!("You've been invited to join {project_name}")
            }
            Self::InvitationResponse {
                project_name,
                member,
                status,
                ..
            } => format!("{member} {status} your invitation to {project_name}"),
            Self::TaskReachedFinalColumn {
                task_title,
                column_name,
                ..
            } => format!("Task \"{task_title}\" moved to {column_name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_tagged_by_template() {
        let payload = NotificationPayload::TaskReachedFinalColumn {
            project_id: ProjectId::new(3),
            project_name: "Launch".to_string(),
            owner_id: UserId::new(1),
            moved_by: "asha".to_string(),
            task_id: TaskId::new(9),
            task_title: "Ship it".to_string(),
            column_name: "Done".to_string(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["template"], "task_reached_final_column");
        assert_eq!(json["columnName"], "Done");
        assert_eq!(payload.subject(), "Task \"Ship it\" moved to Done");
    }
}
