//! Port for application persistence and the joined read models.

use async_trait::async_trait;

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationView, MissionApplicationView,
    MissionId, NewApplication, UserId, VolunteerApplicationView,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationPersistenceError {
        /// Repository connection could not be established.
        Connection =>
            "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "application repository query failed: {message}",
        /// The volunteer already applied to the mission.
        Duplicate => "application already exists: {message}",
        /// The mission or volunteer referenced by the write no longer exists.
        MissingReference => "application references a missing record: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, ApplicationPersistenceError>;

    async fn find_by_volunteer_and_mission(
        &self,
        volunteer_id: UserId,
        mission_id: MissionId,
    ) -> Result<Option<Application>, ApplicationPersistenceError>;

    /// Insert a `pending` application and return the joined creation view.
    async fn create(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationView, ApplicationPersistenceError>;

    async fn list_for_volunteer(
        &self,
        volunteer_id: UserId,
    ) -> Result<Vec<VolunteerApplicationView>, ApplicationPersistenceError>;

    async fn list_for_mission(
        &self,
        mission_id: MissionId,
    ) -> Result<Vec<MissionApplicationView>, ApplicationPersistenceError>;

    /// Set the status of the `(mission, volunteer)` application.
    ///
    /// Returns `None` when no such application exists.
    async fn update_status(
        &self,
        mission_id: MissionId,
        volunteer_id: UserId,
        status: ApplicationStatus,
    ) -> Result<Option<MissionApplicationView>, ApplicationPersistenceError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: ApplicationId) -> Result<bool, ApplicationPersistenceError>;
}
