//! Mission API handlers.
//!
//! Role gating happens here; ownership is enforced by the mission engine.
//!
//! ```text
//! POST   /api/v1/missions            (association)
//! GET    /api/v1/missions            (volunteer)
//! GET    /api/v1/missions/mine       (association)
//! GET    /api/v1/missions/archive    (association)
//! PATCH  /api/v1/missions/{id}       (association)
//! DELETE /api/v1/missions/{id}       (association)
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    MissionDraft, MissionId, MissionListing, MissionPatch, MissionStatus, MissionView, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::DeletedResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, optional_date, parse_id, required_date, required_text,
};

const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const START_DATE: FieldName = FieldName::new("startDate");
const END_DATE: FieldName = FieldName::new("endDate");
const MISSION_ID: FieldName = FieldName::new("id");

/// Body of `POST /missions`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMissionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(format = Date)]
    pub start_date: Option<String>,
    #[schema(format = Date)]
    pub end_date: Option<String>,
}

impl CreateMissionRequest {
    fn into_draft(self) -> ApiResult<MissionDraft> {
        let title = required_text(self.title, TITLE)?;
        let description = required_text(self.description, DESCRIPTION)?;
        let start_date = required_date(self.start_date, START_DATE)?;
        let end_date = required_date(self.end_date, END_DATE)?;
        MissionDraft::new(&title, &description, start_date, end_date)
    }
}

/// Body of `PATCH /missions/{id}`; only present fields change.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMissionRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(format = Date)]
    pub start_date: Option<String>,
    #[schema(format = Date)]
    pub end_date: Option<String>,
    /// `open` or `closed`; a closed mission cannot be reopened.
    pub status: Option<String>,
}

impl UpdateMissionRequest {
    fn into_patch(self) -> ApiResult<MissionPatch> {
        Ok(MissionPatch {
            title: self.title,
            description: self.description,
            start_date: optional_date(self.start_date, START_DATE)?,
            end_date: optional_date(self.end_date, END_DATE)?,
            status: self
                .status
                .map(|raw| raw.parse::<MissionStatus>())
                .transpose()?,
        })
    }
}

/// Post a new open mission.
#[utoipa::path(
    post,
    path = "/api/v1/missions",
    request_body = CreateMissionRequest,
    responses(
        (status = 201, description = "Mission created", body = MissionView),
        (status = 400, description = "Missing field", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Association role required", body = ErrorBody),
        (status = 409, description = "Title already used by this association", body = ErrorBody),
        (status = 422, description = "Malformed date or end before start", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["missions"],
    operation_id = "createMission"
)]
#[post("/missions")]
pub async fn create_mission(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateMissionRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_role(Role::Association)?;
    let draft = payload.into_inner().into_draft()?;
    let view = state.missions.create_mission(actor.id, draft).await?;
    Ok(HttpResponse::Created().json(view))
}

/// Browse every open mission.
#[utoipa::path(
    get,
    path = "/api/v1/missions",
    responses(
        (status = 200, description = "Open missions", body = [MissionView]),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Volunteer role required", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["missions"],
    operation_id = "listOpenMissions"
)]
#[get("/missions")]
pub async fn list_open_missions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MissionView>>> {
    session.require_role(Role::Volunteer)?;
    Ok(web::Json(state.missions.list_open_missions().await?))
}

async fn owned_listing(
    state: &HttpState,
    session: &SessionContext,
    listing: MissionListing,
) -> ApiResult<web::Json<Vec<MissionView>>> {
    let actor = session.require_role(Role::Association)?;
    let missions = state
        .missions
        .list_missions_by_owner(actor.id, listing)
        .await?;
    Ok(web::Json(missions))
}

/// Open missions posted by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/missions/mine",
    responses(
        (status = 200, description = "Active missions", body = [MissionView]),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Association role required", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["missions"],
    operation_id = "listActiveMissions"
)]
#[get("/missions/mine")]
pub async fn list_active_missions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MissionView>>> {
    owned_listing(&state, &session, MissionListing::Active).await
}

/// Closed missions posted by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/missions/archive",
    responses(
        (status = 200, description = "Archived missions", body = [MissionView]),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Association role required", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["missions"],
    operation_id = "listArchivedMissions"
)]
#[get("/missions/archive")]
pub async fn list_archived_missions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<MissionView>>> {
    owned_listing(&state, &session, MissionListing::Archive).await
}

/// Change some fields of a mission the caller owns.
#[utoipa::path(
    patch,
    path = "/api/v1/missions/{id}",
    params(("id" = i64, Path, description = "Mission id")),
    request_body = UpdateMissionRequest,
    responses(
        (status = 200, description = "Updated mission", body = MissionView),
        (status = 400, description = "Empty patch, blank field or bad id", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown mission", body = ErrorBody),
        (status = 409, description = "Title already used", body = ErrorBody),
        (status = 422, description = "Reopening or bad dates", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["missions"],
    operation_id = "updateMission"
)]
#[patch("/missions/{id}")]
pub async fn update_mission(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateMissionRequest>,
) -> ApiResult<web::Json<MissionView>> {
    let actor = session.require_role(Role::Association)?;
    let id: MissionId = parse_id(&path, MISSION_ID)?;
    let patch = payload.into_inner().into_patch()?;
    let view = state.missions.update_mission(id, actor.id, patch).await?;
    Ok(web::Json(view))
}

/// Remove a mission the caller owns, with its applications.
#[utoipa::path(
    delete,
    path = "/api/v1/missions/{id}",
    params(("id" = i64, Path, description = "Mission id")),
    responses(
        (status = 200, description = "Mission deleted", body = DeletedResponse),
        (status = 400, description = "Bad id", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown mission", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["missions"],
    operation_id = "deleteMission"
)]
#[delete("/missions/{id}")]
pub async fn delete_mission(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let actor = session.require_role(Role::Association)?;
    let id: MissionId = parse_id(&path, MISSION_ID)?;
    let removed = state.missions.delete_mission(id, actor.id).await?;
    info!(mission_id = %removed.id, title = %removed.title, "mission removed via API");
    Ok(web::Json(DeletedResponse::new(removed.id, "mission deleted")))
}
