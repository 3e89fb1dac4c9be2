//! Driving port for the application lifecycle.

use async_trait::async_trait;

use crate::domain::{
    Application, ApplicationDecision, ApplicationId, ApplicationView, Error,
    MissionApplicationView, MissionId, UserId, VolunteerApplicationView,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationLifecycle: Send + Sync {
    /// Apply to an open mission.
    async fn create_application(
        &self,
        volunteer_id: UserId,
        mission_id: MissionId,
    ) -> Result<ApplicationView, Error>;

    async fn list_for_volunteer(
        &self,
        volunteer_id: UserId,
    ) -> Result<Vec<VolunteerApplicationView>, Error>;

    /// Applicants of a mission, visible to its owner only.
    async fn list_for_mission(
        &self,
        actor_id: UserId,
        mission_id: MissionId,
    ) -> Result<Vec<MissionApplicationView>, Error>;

    /// Record the owner's decision on a volunteer's application.
    async fn update_status(
        &self,
        actor_id: UserId,
        mission_id: MissionId,
        volunteer_id: UserId,
        decision: ApplicationDecision,
    ) -> Result<MissionApplicationView, Error>;

    /// Withdraw an application; only the applicant may do so.
    async fn delete_application(
        &self,
        id: ApplicationId,
        actor_id: UserId,
    ) -> Result<Application, Error>;
}
