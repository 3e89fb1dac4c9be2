//! PostgreSQL-backed `ApplicationRepository`.
//!
//! `applications` references `users` twice (directly through the volunteer
//! and through the mission owner), so the read models are assembled from
//! single-join queries instead of aliasing `users`.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ApplicationPersistenceError, ApplicationRepository};
use crate::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationView, Mission,
    MissionApplicationView, MissionId, NewApplication, UserId, VolunteerApplicationView,
};

use super::error_mapping::{map_diesel_error, map_invalid_row, map_pool_error};
use super::models::{ApplicationRow, MissionRow, NewApplicationRow};
use super::pool::DbPool;
use super::schema::{applications, missions, users};

type RepoResult<T> = Result<T, ApplicationPersistenceError>;

#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_application(row: ApplicationRow) -> RepoResult<Application> {
    Application::try_from(row).map_err(map_invalid_row)
}

fn to_mission(row: MissionRow) -> RepoResult<Mission> {
    Mission::try_from(row).map_err(map_invalid_row)
}

async fn username_of(conn: &mut AsyncPgConnection, id: i64) -> RepoResult<String> {
    users::table
        .find(id)
        .select(users::username)
        .first(conn)
        .await
        .map_err(map_diesel_error)
}

async fn mission_with_owner(
    conn: &mut AsyncPgConnection,
    id: i64,
) -> RepoResult<(Mission, String)> {
    let (row, owner) = missions::table
        .inner_join(users::table)
        .filter(missions::id.eq(id))
        .select((MissionRow::as_select(), users::username))
        .first::<(MissionRow, String)>(conn)
        .await
        .map_err(map_diesel_error)?;
    Ok((to_mission(row)?, owner))
}

fn applicant_view(
    application: Application,
    username: String,
    title: String,
) -> MissionApplicationView {
    MissionApplicationView {
        id: application.id,
        volunteer_id: application.volunteer_id,
        username,
        title,
        status: application.status,
    }
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn find_by_id(&self, id: ApplicationId) -> RepoResult<Option<Application>> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        applications::table
            .find(id.get())
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_application)
            .transpose()
    }

    async fn find_by_volunteer_and_mission(
        &self,
        volunteer_id: UserId,
        mission_id: MissionId,
    ) -> RepoResult<Option<Application>> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        applications::table
            .filter(applications::volunteer_id.eq(volunteer_id.get()))
            .filter(applications::mission_id.eq(mission_id.get()))
            .select(ApplicationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(to_application)
            .transpose()
    }

    async fn create(&self, application: &NewApplication) -> RepoResult<ApplicationView> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(applications::table)
            .values(NewApplicationRow {
                volunteer_id: application.volunteer_id.get(),
                mission_id: application.mission_id.get(),
                status: ApplicationStatus::Pending.as_str(),
            })
            .returning(ApplicationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let stored = to_application(row)?;
        let volunteer = username_of(&mut conn, stored.volunteer_id.get()).await?;
        let (mission, association) =
            mission_with_owner(&mut conn, stored.mission_id.get()).await?;

        Ok(ApplicationView {
            id: stored.id,
            volunteer_id: stored.volunteer_id,
            volunteer,
            mission_id: mission.id,
            title: mission.title,
            description: mission.description,
            start_date: mission.start_date,
            end_date: mission.end_date,
            association,
            status: stored.status,
        })
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: UserId,
    ) -> RepoResult<Vec<VolunteerApplicationView>> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = applications::table
            .inner_join(missions::table.inner_join(users::table))
            .filter(applications::volunteer_id.eq(volunteer_id.get()))
            .order(applications::id.asc())
            .select((
                ApplicationRow::as_select(),
                MissionRow::as_select(),
                users::username,
            ))
            .load::<(ApplicationRow, MissionRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mission_ids: Vec<i64> = rows.iter().map(|(row, _, _)| row.mission_id).collect();
        let counts: HashMap<i64, i64> = applications::table
            .filter(applications::mission_id.eq_any(mission_ids))
            .group_by(applications::mission_id)
            .select((applications::mission_id, count_star()))
            .load::<(i64, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|(application_row, mission_row, association)| {
                let application = to_application(application_row)?;
                let mission = to_mission(mission_row)?;
                Ok(VolunteerApplicationView {
                    id: application.id,
                    mission_id: mission.id,
                    title: mission.title,
                    description: mission.description,
                    start_date: mission.start_date,
                    end_date: mission.end_date,
                    association_id: mission.owner_id,
                    association,
                    status: application.status,
                    applications: counts.get(&mission.id.get()).copied().unwrap_or(0),
                })
            })
            .collect()
    }

    async fn list_for_mission(
        &self,
        mission_id: MissionId,
    ) -> RepoResult<Vec<MissionApplicationView>> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let title: String = missions::table
            .find(mission_id.get())
            .select(missions::title)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        applications::table
            .inner_join(users::table.on(applications::volunteer_id.eq(users::id)))
            .filter(applications::mission_id.eq(mission_id.get()))
            .order(applications::id.asc())
            .select((ApplicationRow::as_select(), users::username))
            .load::<(ApplicationRow, String)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(|(row, username)| {
                Ok(applicant_view(
                    to_application(row)?,
                    username,
                    title.clone(),
                ))
            })
            .collect()
    }

    async fn update_status(
        &self,
        mission_id: MissionId,
        volunteer_id: UserId,
        status: ApplicationStatus,
    ) -> RepoResult<Option<MissionApplicationView>> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            applications::table
                .filter(applications::mission_id.eq(mission_id.get()))
                .filter(applications::volunteer_id.eq(volunteer_id.get())),
        )
        .set(applications::status.eq(status.as_str()))
        .returning(ApplicationRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        let Some(row) = updated else {
            return Ok(None);
        };

        let application = to_application(row)?;
        let username = username_of(&mut conn, volunteer_id.get()).await?;
        let title: String = missions::table
            .find(mission_id.get())
            .select(missions::title)
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(applicant_view(application, username, title)))
    }

    async fn delete(&self, id: ApplicationId) -> RepoResult<bool> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(applications::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
