//! Application lifecycle engine.
//!
//! Consults the mission lifecycle for existence, state, and ownership before
//! touching applications. Decisions move `pending` to `accepted` or
//! `rejected`; an owner may revise a decision but never reset it to pending.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    ApplicationLifecycle, ApplicationPersistenceError, ApplicationRepository, MissionLifecycle,
};
use crate::domain::{
    Application, ApplicationDecision, ApplicationId, ApplicationStatus, ApplicationView, Error,
    Mission, MissionApplicationView, MissionId, NewApplication, UserId, VolunteerApplicationView,
};

fn map_application_persistence_error(err: ApplicationPersistenceError) -> Error {
    match err {
        ApplicationPersistenceError::Duplicate { .. } => already_applied(),
        ApplicationPersistenceError::MissingReference { .. } => {
            Error::data_not_found("the mission no longer exists")
        }
        ApplicationPersistenceError::Connection { .. }
        | ApplicationPersistenceError::Query { .. } => {
            error!(error = %err, "application storage failed");
            Error::storage_failure("application storage is unavailable")
        }
    }
}

fn already_applied() -> Error {
    Error::data_already_exist("you have already applied to this mission")
}

/// [`ApplicationLifecycle`] over a mission lifecycle and an application
/// repository.
#[derive(Clone)]
pub struct ApplicationService<M, R> {
    missions: Arc<M>,
    applications: Arc<R>,
}

impl<M, R> ApplicationService<M, R> {
    /// Create a new service over the mission lifecycle and application
    /// repository.
    pub fn new(missions: Arc<M>, applications: Arc<R>) -> Self {
        Self {
            missions,
            applications,
        }
    }
}

impl<M, R> ApplicationService<M, R>
where
    M: MissionLifecycle,
    R: ApplicationRepository,
{
    async fn existing_mission(&self, id: MissionId) -> Result<Mission, Error> {
        self.missions
            .get_mission_by_id(id)
            .await?
            .ok_or_else(|| Error::data_not_found(format!("mission {id} not found")))
    }

    async fn owned_mission(&self, id: MissionId, actor_id: UserId) -> Result<Mission, Error> {
        let mission = self.existing_mission(id).await?;
        if !mission.is_owned_by(actor_id) {
            warn!(mission_id = %id, actor_id = %actor_id, "applications requested by non-owner");
            return Err(Error::forbidden("this mission belongs to another association"));
        }
        Ok(mission)
    }
}

#[async_trait]
impl<M, R> ApplicationLifecycle for ApplicationService<M, R>
where
    M: MissionLifecycle,
    R: ApplicationRepository,
{
    async fn create_application(
        &self,
        volunteer_id: UserId,
        mission_id: MissionId,
    ) -> Result<ApplicationView, Error> {
        let mission = self.existing_mission(mission_id).await?;
        if !mission.is_open() {
            return Err(Error::forbidden("this mission is closed to new applications")
                .with_details(json!({ "missionStatus": mission.status })));
        }

        let existing = self
            .applications
            .find_by_volunteer_and_mission(volunteer_id, mission_id)
            .await
            .map_err(map_application_persistence_error)?;
        if existing.is_some() {
            return Err(already_applied());
        }

        let view = self
            .applications
            .create(&NewApplication {
                volunteer_id,
                mission_id,
            })
            .await
            .map_err(map_application_persistence_error)?;
        info!(
            application_id = %view.id,
            mission_id = %mission_id,
            volunteer_id = %volunteer_id,
            "application submitted"
        );
        Ok(view)
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: UserId,
    ) -> Result<Vec<VolunteerApplicationView>, Error> {
        self.applications
            .list_for_volunteer(volunteer_id)
            .await
            .map_err(map_application_persistence_error)
    }

    async fn list_for_mission(
        &self,
        actor_id: UserId,
        mission_id: MissionId,
    ) -> Result<Vec<MissionApplicationView>, Error> {
        self.owned_mission(mission_id, actor_id).await?;
        self.applications
            .list_for_mission(mission_id)
            .await
            .map_err(map_application_persistence_error)
    }

    async fn update_status(
        &self,
        actor_id: UserId,
        mission_id: MissionId,
        volunteer_id: UserId,
        decision: ApplicationDecision,
    ) -> Result<MissionApplicationView, Error> {
        self.owned_mission(mission_id, actor_id).await?;

        let not_found = || {
            Error::data_not_found(format!(
                "volunteer {volunteer_id} has not applied to mission {mission_id}"
            ))
        };
        let existing = self
            .applications
            .find_by_volunteer_and_mission(volunteer_id, mission_id)
            .await
            .map_err(map_application_persistence_error)?;
        if existing.is_none() {
            return Err(not_found());
        }

        let status = ApplicationStatus::from(decision);
        let view = self
            .applications
            .update_status(mission_id, volunteer_id, status)
            .await
            .map_err(map_application_persistence_error)?
            .ok_or_else(not_found)?;
        info!(
            application_id = %view.id,
            mission_id = %mission_id,
            status = %status,
            "application decided"
        );
        Ok(view)
    }

    async fn delete_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
    ) -> Result<Application, Error> {
        let not_found = || Error::data_not_found(format!("application {id} not found"));
        let application = self
            .applications
            .find_by_id(id)
            .await
            .map_err(map_application_persistence_error)?
            .ok_or_else(not_found)?;
        if application.volunteer_id != actor_id {
            warn!(application_id = %id, actor_id = %actor_id, "withdrawal by non-applicant");
            return Err(Error::forbidden("only the applicant may withdraw an application"));
        }

        let removed = self
            .applications
            .delete(id)
            .await
            .map_err(map_application_persistence_error)?;
        if !removed {
            return Err(not_found());
        }
        info!(application_id = %id, "application withdrawn");
        Ok(application)
    }
}

#[cfg(test)]
#[path = "application_service_tests.rs"]
mod tests;
