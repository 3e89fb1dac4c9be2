//! Port for mission persistence.
//!
//! Reads that return [`MissionView`] join the owner's username so callers
//! never need a second lookup.

use async_trait::async_trait;

use crate::domain::{
    Mission, MissionId, MissionPatch, MissionStatus, MissionView, NewMission, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by mission repository adapters.
    pub enum MissionPersistenceError {
        /// Repository connection could not be established.
        Connection => "mission repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query => "mission repository query failed: {message}",
        /// The `(owner, title)` pair is already taken.
        Duplicate => "mission already exists: {message}",
        /// The owner referenced by the write no longer exists.
        MissingReference => "mission references a missing record: {message}",
        /// The update would reopen a mission that is already closed.
        StaleStatus => "mission is closed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MissionRepository: Send + Sync {
    async fn find_by_id(&self, id: MissionId) -> Result<Option<Mission>, MissionPersistenceError>;

    async fn find_view_by_id(
        &self,
        id: MissionId,
    ) -> Result<Option<MissionView>, MissionPersistenceError>;

    /// Look up an owner's mission by exact title.
    async fn find_by_owner_and_title(
        &self,
        owner_id: UserId,
        title: &str,
    ) -> Result<Option<Mission>, MissionPersistenceError>;

    /// Insert an `open` mission.
    async fn create(&self, mission: &NewMission) -> Result<MissionView, MissionPersistenceError>;

    /// All missions in `status`, in storage order.
    async fn list_by_status(
        &self,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, MissionPersistenceError>;

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, MissionPersistenceError>;

    /// Write only the fields present in `patch`, in one atomic step.
    ///
    /// A patch reopening a mission that is closed in storage fails with
    /// [`MissionPersistenceError::StaleStatus`], whatever the caller read
    /// earlier. Returns `None` when the mission no longer exists.
    async fn update(
        &self,
        id: MissionId,
        patch: &MissionPatch,
    ) -> Result<Option<MissionView>, MissionPersistenceError>;

    /// Remove a mission together with its applications.
    ///
    /// Returns whether a row was removed.
    async fn delete(&self, id: MissionId) -> Result<bool, MissionPersistenceError>;
}
