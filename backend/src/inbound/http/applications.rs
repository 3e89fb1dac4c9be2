//! Application API handlers.
//!
//! ```text
//! POST   /api/v1/missions/{id}/applications          (volunteer)
//! GET    /api/v1/missions/{id}/applications          (association, owner)
//! PUT    /api/v1/missions/{id}/applications/status   (association, owner)
//! GET    /api/v1/applications/mine                   (volunteer)
//! DELETE /api/v1/applications/{id}                   (volunteer, applicant)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    ApplicationDecision, ApplicationId, ApplicationView, MissionApplicationView, MissionId, Role,
    UserId, VolunteerApplicationView,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::DeletedResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, required_id};

const MISSION_ID: FieldName = FieldName::new("missionId");
const APPLICATION_ID: FieldName = FieldName::new("id");
const VOLUNTEER_ID: FieldName = FieldName::new("volunteerId");

/// Body of `PUT /missions/{id}/applications/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub volunteer_id: Option<i64>,
    /// `accepted` or `rejected`.
    pub status: Option<String>,
}

/// Apply to an open mission.
#[utoipa::path(
    post,
    path = "/api/v1/missions/{id}/applications",
    params(("id" = i64, Path, description = "Mission id")),
    responses(
        (status = 201, description = "Application created", body = ApplicationView),
        (status = 400, description = "Bad id", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Volunteer role required or mission closed", body = ErrorBody),
        (status = 404, description = "Unknown mission", body = ErrorBody),
        (status = 409, description = "Already applied", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["applications"],
    operation_id = "createApplication"
)]
#[post("/missions/{id}/applications")]
pub async fn create_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_role(Role::Volunteer)?;
    let mission_id: MissionId = parse_id(&path, MISSION_ID)?;
    let view = state
        .applications
        .create_application(actor.id, mission_id)
        .await?;
    Ok(HttpResponse::Created().json(view))
}

/// Applicants of a mission the caller owns.
#[utoipa::path(
    get,
    path = "/api/v1/missions/{id}/applications",
    params(("id" = i64, Path, description = "Mission id")),
    responses(
        (status = 200, description = "Applicants", body = [MissionApplicationView]),
        (status = 400, description = "Bad id", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown mission", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["applications"],
    operation_id = "listMissionApplications"
)]
#[get("/missions/{id}/applications")]
pub async fn list_mission_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<MissionApplicationView>>> {
    let actor = session.require_role(Role::Association)?;
    let mission_id: MissionId = parse_id(&path, MISSION_ID)?;
    let applicants = state
        .applications
        .list_for_mission(actor.id, mission_id)
        .await?;
    Ok(web::Json(applicants))
}

/// Accept or reject a volunteer's application.
#[utoipa::path(
    put,
    path = "/api/v1/missions/{id}/applications/status",
    params(("id" = i64, Path, description = "Mission id")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Updated application", body = MissionApplicationView),
        (status = 400, description = "Missing volunteer or status", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Not the owner", body = ErrorBody),
        (status = 404, description = "Unknown mission or application", body = ErrorBody),
        (status = 422, description = "Unknown decision", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["applications"],
    operation_id = "decideApplication"
)]
#[put("/missions/{id}/applications/status")]
pub async fn decide_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DecisionRequest>,
) -> ApiResult<web::Json<MissionApplicationView>> {
    let actor = session.require_role(Role::Association)?;
    let mission_id: MissionId = parse_id(&path, MISSION_ID)?;
    let DecisionRequest {
        volunteer_id,
        status,
    } = payload.into_inner();
    let volunteer_id: UserId = required_id(volunteer_id, VOLUNTEER_ID)?;
    let decision = ApplicationDecision::parse(status.as_deref())?;
    let view = state
        .applications
        .update_status(actor.id, mission_id, volunteer_id, decision)
        .await?;
    info!(
        mission_id = %mission_id,
        volunteer_id = %volunteer_id,
        status = %view.status,
        "application decided"
    );
    Ok(web::Json(view))
}

/// The caller's applications with mission details.
#[utoipa::path(
    get,
    path = "/api/v1/applications/mine",
    responses(
        (status = 200, description = "Applications", body = [VolunteerApplicationView]),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Volunteer role required", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["applications"],
    operation_id = "listMyApplications"
)]
#[get("/applications/mine")]
pub async fn list_my_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<VolunteerApplicationView>>> {
    let actor = session.require_role(Role::Volunteer)?;
    Ok(web::Json(
        state.applications.list_for_volunteer(actor.id).await?,
    ))
}

/// Withdraw one of the caller's applications.
#[utoipa::path(
    delete,
    path = "/api/v1/applications/{id}",
    params(("id" = i64, Path, description = "Application id")),
    responses(
        (status = 200, description = "Application deleted", body = DeletedResponse),
        (status = 400, description = "Bad id", body = ErrorBody),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Not the applicant", body = ErrorBody),
        (status = 404, description = "Unknown application", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tags = ["applications"],
    operation_id = "deleteApplication"
)]
#[delete("/applications/{id}")]
pub async fn delete_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedResponse>> {
    let actor = session.require_role(Role::Volunteer)?;
    let id: ApplicationId = parse_id(&path, APPLICATION_ID)?;
    let removed = state.applications.delete_application(id, actor.id).await?;
    Ok(web::Json(DeletedResponse::new(
        removed.id,
        "application deleted",
    )))
}
