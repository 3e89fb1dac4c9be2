//! Mission lifecycle engine.
//!
//! Enforces ownership, title uniqueness per owner, and the `open → closed`
//! state machine before delegating to the mission repository.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{MissionLifecycle, MissionPersistenceError, MissionRepository};
use crate::domain::mission::reopen_refused;
use crate::domain::{
    Error, Mission, MissionDraft, MissionId, MissionListing, MissionPatch, MissionStatus,
    MissionView, NewMission, UserId,
};

fn map_mission_persistence_error(err: MissionPersistenceError) -> Error {
    match err {
        MissionPersistenceError::Duplicate { .. } => title_taken(),
        MissionPersistenceError::StaleStatus { .. } => reopen_refused(),
        MissionPersistenceError::MissingReference { .. } => {
            Error::data_not_found("the owning account no longer exists")
        }
        MissionPersistenceError::Connection { .. } | MissionPersistenceError::Query { .. } => {
            error!(error = %err, "mission storage failed");
            Error::storage_failure("mission storage is unavailable")
        }
    }
}

fn title_taken() -> Error {
    Error::data_already_exist("you already have a mission with this title")
        .with_details(json!({ "field": "title" }))
}

fn mission_not_found(id: MissionId) -> Error {
    Error::data_not_found(format!("mission {id} not found"))
}

/// [`MissionLifecycle`] backed by a [`MissionRepository`].
#[derive(Clone)]
pub struct MissionService<R> {
    missions: Arc<R>,
}

impl<R> MissionService<R> {
    /// Create a new service over the given mission repository.
    pub fn new(missions: Arc<R>) -> Self {
        Self { missions }
    }
}

impl<R> MissionService<R>
where
    R: MissionRepository,
{
    async fn owned_mission(&self, id: MissionId, actor_id: UserId) -> Result<Mission, Error> {
        let mission = self
            .missions
            .find_by_id(id)
            .await
            .map_err(map_mission_persistence_error)?
            .ok_or_else(|| mission_not_found(id))?;
        if !mission.is_owned_by(actor_id) {
            warn!(mission_id = %id, actor_id = %actor_id, "mission ownership check failed");
            return Err(Error::forbidden("this mission belongs to another association"));
        }
        Ok(mission)
    }
}

#[async_trait]
impl<R> MissionLifecycle for MissionService<R>
where
    R: MissionRepository,
{
    async fn create_mission(
        &self,
        owner_id: UserId,
        draft: MissionDraft,
    ) -> Result<MissionView, Error> {
        let existing = self
            .missions
            .find_by_owner_and_title(owner_id, draft.title())
            .await
            .map_err(map_mission_persistence_error)?;
        if existing.is_some() {
            return Err(title_taken());
        }

        let view = self
            .missions
            .create(&NewMission { owner_id, draft })
            .await
            .map_err(map_mission_persistence_error)?;
        info!(mission_id = %view.id, owner_id = %owner_id, "mission created");
        Ok(view)
    }

    async fn get_mission_by_id(&self, id: MissionId) -> Result<Option<Mission>, Error> {
        self.missions
            .find_by_id(id)
            .await
            .map_err(map_mission_persistence_error)
    }

    async fn list_open_missions(&self) -> Result<Vec<MissionView>, Error> {
        self.missions
            .list_by_status(MissionStatus::Open)
            .await
            .map_err(map_mission_persistence_error)
    }

    async fn list_missions_by_owner(
        &self,
        owner_id: UserId,
        listing: MissionListing,
    ) -> Result<Vec<MissionView>, Error> {
        self.missions
            .list_by_owner(owner_id, listing.status())
            .await
            .map_err(map_mission_persistence_error)
    }

    async fn update_mission(
        &self,
        id: MissionId,
        actor_id: UserId,
        patch: MissionPatch,
    ) -> Result<MissionView, Error> {
        let patch = patch.validate()?;
        let current = self.owned_mission(id, actor_id).await?;
        // The repository re-checks the stored status on write.
        let updated = current.apply(&patch)?;

        if updated.title != current.title {
            let clash = self
                .missions
                .find_by_owner_and_title(updated.owner_id, &updated.title)
                .await
                .map_err(map_mission_persistence_error)?;
            if clash.is_some_and(|other| other.id != id) {
                return Err(title_taken());
            }
        }

        let view = self
            .missions
            .update(id, &patch)
            .await
            .map_err(map_mission_persistence_error)?
            .ok_or_else(|| mission_not_found(id))?;
        info!(mission_id = %id, status = %view.status, "mission updated");
        Ok(view)
    }

    async fn delete_mission(&self, id: MissionId, actor_id: UserId) -> Result<Mission, Error> {
        let mission = self.owned_mission(id, actor_id).await?;
        let removed = self
            .missions
            .delete(id)
            .await
            .map_err(map_mission_persistence_error)?;
        if !removed {
            return Err(mission_not_found(id));
        }
        info!(mission_id = %id, "mission deleted");
        Ok(mission)
    }
}

#[cfg(test)]
#[path = "mission_service_tests.rs"]
mod tests;
