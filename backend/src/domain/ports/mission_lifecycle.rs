//! Driving port for the mission lifecycle.

use async_trait::async_trait;

use crate::domain::{
    Error, Mission, MissionDraft, MissionId, MissionListing, MissionPatch, MissionView, UserId,
};

/// Mission use-cases. Role capability is checked by the caller; ownership
/// is checked here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MissionLifecycle: Send + Sync {
    /// Post an `open` mission for `owner_id`.
    async fn create_mission(
        &self,
        owner_id: UserId,
        draft: MissionDraft,
    ) -> Result<MissionView, Error>;

    async fn get_mission_by_id(&self, id: MissionId) -> Result<Option<Mission>, Error>;

    async fn list_open_missions(&self) -> Result<Vec<MissionView>, Error>;

    async fn list_missions_by_owner(
        &self,
        owner_id: UserId,
        listing: MissionListing,
    ) -> Result<Vec<MissionView>, Error>;

    async fn update_mission(
        &self,
        id: MissionId,
        actor_id: UserId,
        patch: MissionPatch,
    ) -> Result<MissionView, Error>;

    /// Remove a mission and its applications, returning what was removed.
    async fn delete_mission(&self, id: MissionId, actor_id: UserId) -> Result<Mission, Error>;
}
