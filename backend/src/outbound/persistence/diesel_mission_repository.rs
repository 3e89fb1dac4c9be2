//! PostgreSQL-backed `MissionRepository`.
//!
//! Views join `users` once to pick up the owner's username. Updates write
//! only the patched columns, and a reopening patch only matches rows that
//! are still open. Deleting a mission relies on `ON DELETE CASCADE` to
//! remove its applications.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{MissionPersistenceError, MissionRepository};
use crate::domain::{
    Mission, MissionId, MissionPatch, MissionStatus, MissionView, NewMission, UserId,
};

use super::error_mapping::{map_diesel_error, map_invalid_row, map_pool_error};
use super::models::{MissionChangeset, MissionRow, NewMissionRow};
use super::pool::DbPool;
use super::schema::{missions, users};

#[derive(Clone)]
pub struct DieselMissionRepository {
    pool: DbPool,
}

impl DieselMissionRepository {
    /// Create a repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_mission(row: MissionRow) -> Result<Mission, MissionPersistenceError> {
    Mission::try_from(row).map_err(map_invalid_row)
}

fn to_view((row, creator): (MissionRow, String)) -> Result<MissionView, MissionPersistenceError> {
    Ok(MissionView::from_mission(to_mission(row)?, creator))
}

async fn load_view(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> Result<Option<MissionView>, MissionPersistenceError> {
    missions::table
        .inner_join(users::table)
        .filter(missions::id.eq(id))
        .select((MissionRow::as_select(), users::username))
        .first::<(MissionRow, String)>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?
        .map(to_view)
        .transpose()
}

#[async_trait]
impl MissionRepository for DieselMissionRepository {
    async fn find_by_id(&self, id: MissionId) -> Result<Option<Mission>, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        missions::table
            .find(id.get())
            .select(MissionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_mission)
            .transpose()
    }

    async fn find_view_by_id(
        &self,
        id: MissionId,
    ) -> Result<Option<MissionView>, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_view(&mut conn, id.get()).await
    }

    async fn find_by_owner_and_title(
        &self,
        owner_id: UserId,
        title: &str,
    ) -> Result<Option<Mission>, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        missions::table
            .filter(missions::owner_id.eq(owner_id.get()))
            .filter(missions::title.eq(title))
            .select(MissionRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_mission)
            .transpose()
    }

    async fn create(&self, mission: &NewMission) -> Result<MissionView, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let draft = &mission.draft;
        let id: i64 = diesel::insert_into(missions::table)
            .values(NewMissionRow {
                owner_id: mission.owner_id.get(),
                title: draft.title(),
                description: draft.description(),
                start_date: draft.start_date(),
                end_date: draft.end_date(),
                status: MissionStatus::Open.as_str(),
            })
            .returning(missions::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        load_view(&mut conn, id).await?.ok_or_else(|| {
            MissionPersistenceError::query(format!("mission {id} vanished after insert"))
        })
    }

    async fn list_by_status(
        &self,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        missions::table
            .inner_join(users::table)
            .filter(missions::status.eq(status.as_str()))
            .order(missions::id.asc())
            .select((MissionRow::as_select(), users::username))
            .load::<(MissionRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_view)
            .collect()
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        missions::table
            .inner_join(users::table)
            .filter(missions::owner_id.eq(owner_id.get()))
            .filter(missions::status.eq(status.as_str()))
            .order(missions::id.asc())
            .select((MissionRow::as_select(), users::username))
            .load::<(MissionRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(to_view)
            .collect()
    }

    async fn update(
        &self,
        id: MissionId,
        patch: &MissionPatch,
    ) -> Result<Option<MissionView>, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = MissionChangeset::from(patch);
        let updated = if patch.status == Some(MissionStatus::Open) {
            diesel::update(
                missions::table
                    .find(id.get())
                    .filter(missions::status.eq(MissionStatus::Open.as_str())),
            )
            .set(changes)
            .execute(&mut conn)
            .await
        } else {
            diesel::update(missions::table.find(id.get()))
                .set(changes)
                .execute(&mut conn)
                .await
        };
        let affected = updated.map_err(map_diesel_error)?;

        if affected == 0 {
            let exists: bool = diesel::select(diesel::dsl::exists(missions::table.find(id.get())))
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            // Only the open-status filter can skip an existing row.
            if exists {
                return Err(MissionPersistenceError::stale_status(format!(
                    "mission {id}"
                )));
            }
            return Ok(None);
        }
        load_view(&mut conn, id.get()).await
    }

    async fn delete(&self, id: MissionId) -> Result<bool, MissionPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(missions::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
