//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint of the inbound layer, the request
//! and response schemas they reference, and the session cookie security
//! scheme. The document backs Swagger UI in debug builds and is exported via
//! `cargo run --bin openapi-dump` for client generation.

use crate::domain::{
    Application, ApplicationStatus, ApplicationView, ErrorCode, MissionApplicationView,
    MissionStatus, MissionView, Role, SafeUser, VolunteerApplicationView,
};
use crate::inbound::http::applications::DecisionRequest;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::missions::{CreateMissionRequest, UpdateMissionRequest};
use crate::inbound::http::schemas::DeletedResponse;
use crate::inbound::http::users::{LoginRequest, RegisterRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/users/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Mission board API",
        description = "Missions posted by associations and the volunteers who apply to them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::missions::create_mission,
        crate::inbound::http::missions::list_open_missions,
        crate::inbound::http::missions::list_active_missions,
        crate::inbound::http::missions::list_archived_missions,
        crate::inbound::http::missions::update_mission,
        crate::inbound::http::missions::delete_mission,
        crate::inbound::http::applications::create_application,
        crate::inbound::http::applications::list_mission_applications,
        crate::inbound::http::applications::decide_application,
        crate::inbound::http::applications::list_my_applications,
        crate::inbound::http::applications::delete_application,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        ErrorCode,
        SafeUser,
        Role,
        RegisterRequest,
        LoginRequest,
        MissionView,
        MissionStatus,
        CreateMissionRequest,
        UpdateMissionRequest,
        Application,
        ApplicationStatus,
        ApplicationView,
        VolunteerApplicationView,
        MissionApplicationView,
        DecisionRequest,
        DeletedResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and sessions"),
        (name = "missions", description = "Missions posted by associations"),
        (name = "applications", description = "Volunteer applications and decisions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
