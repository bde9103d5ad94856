use axum::{
    extract::State,
    routing::{delete, get, put},
    Router,
};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::{
    extract::{Json, Path},
    ApiError, ApiSuccess,
};
use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{
        CreateProjectRequest, InvitationStatus, MemberRole, NewKanbanColumn, Project,
        ProjectId, ProjectStatus, TeamMemberRequest, UpdateProjectRequest, UserId,
    },
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberPayload {
    user_id: UserId,
    role: MemberRole,
}

#[derive(Debug, Deserialize)]
pub struct KanbanColumnPayload {
    name: String,
    order: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    name: String,
    description: Option<String>,
    status: Option<ProjectStatus>,
    #[serde(default, with = "lenient_date::option")]
    start_date: Option<Date>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
    completion_percentage: Option<i32>,
    #[serde(default)]
    team_members: Vec<TeamMemberPayload>,
    #[serde(default)]
    kanban_columns: Vec<KanbanColumnPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectPayload {
    name: Option<String>,
    description: Option<String>,
    status: Option<ProjectStatus>,
    #[serde(default, with = "lenient_date::option")]
    start_date: Option<Date>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
    completion_percentage: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct InvitationPayload {
    status: InvitationStatus,
}

#[instrument(name = "POST /projects", skip(app_state))]
async fn create_project(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<ApiSuccess<Project>, ApiError> {
    let request = CreateProjectRequest {
        name: payload.name,
        description: payload.description,
        status: payload.status,
        start_date: payload.start_date,
        end_date: payload.end_date,
        completion_percentage: payload.completion_percentage,
        team_members: payload
            .team_members
            .into_iter()
            .map(|m| TeamMemberRequest {
                user_id: m.user_id,
                role: m.role,
            })
            .collect(),
        kanban_columns: payload
            .kanban_columns
            .into_iter()
            .map(|c| NewKanbanColumn {
                name: c.name,
                order: c.order,
            })
            .collect(),
    };
    let project = app_state.board.create_project(user.id, request).await?;
    Ok(ApiSuccess::created("project", project))
}

#[instrument(name = "GET /projects", skip(app_state))]
async fn list_projects(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiSuccess<Vec<Project>>, ApiError> {
    let projects = app_state.board.list_projects(user.id).await?;
    Ok(ApiSuccess::ok("projects", projects))
}

#[instrument(name = "GET /projects/:id", skip(app_state))]
async fn get_project(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<ApiSuccess<Project>, ApiError> {
    let project = app_state.board.get_project(user.id, id).await?;
    Ok(ApiSuccess::ok("project", project))
}

#[instrument(name = "PUT /projects/:id", skip(app_state))]
async fn update_project(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(payload): Json<UpdateProjectPayload>,
) -> Result<ApiSuccess<Project>, ApiError> {
    let request = UpdateProjectRequest {
        name: payload.name,
        description: payload.description,
        status: payload.status,
        start_date: payload.start_date,
        end_date: payload.end_date,
        completion_percentage: payload.completion_percentage,
    };
    let project = app_state.board.update_project(user.id, id, request).await?;
    Ok(ApiSuccess::ok("project", project))
}

#[instrument(name = "DELETE /projects/:id", skip(app_state))]
async fn delete_project(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.board.delete_project(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Project deleted successfully"))
}

#[instrument(name = "PUT /projects/:id/invitation", skip(app_state))]
async fn respond_to_invitation(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(payload): Json<InvitationPayload>,
) -> Result<ApiSuccess<Project>, ApiError> {
    let project = app_state
        .board
        .respond_to_invitation(user.id, id, payload.status)
        .await?;
    Ok(ApiSuccess::ok("project", project))
}

#[instrument(name = "DELETE /projects/:id/team/:user_id", skip(app_state))]
async fn remove_team_member(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path((id, member)): Path<(ProjectId, UserId)>,
) -> Result<ApiSuccess<Project>, ApiError> {
    let project = app_state
        .board
        .remove_team_member(user.id, id, member)
        .await?;
    Ok(ApiSuccess::ok("project", project))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route(
            "/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/:id/invitation", put(respond_to_invitation))
        .route("/:id/team/:user_id", delete(remove_team_member))
}
