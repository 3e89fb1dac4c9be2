//! Diesel row structs. Internal to the persistence adapter.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::{
    Application, ApplicationId, ApplicationStatus, Email, Mission, MissionId, MissionPatch,
    MissionStatus, NewUser, PasswordHash, Role, User, UserId, Username,
};

use super::schema::{applications, missions, users};

/// Raised when a stored row no longer satisfies domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{table} row {id} is invalid: {reason}")]
pub(crate) struct InvalidRow {
    table: &'static str,
    id: i64,
    reason: String,
}

impl InvalidRow {
    fn new(table: &'static str, id: i64, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = InvalidRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| InvalidRow::new("users", row.id, reason);
        let id = UserId::new(row.id).map_err(|err| invalid(err.to_string()))?;
        let account = NewUser {
            username: Username::new(&row.username).map_err(|err| invalid(err.to_string()))?,
            email: Email::new(&row.email).map_err(|err| invalid(err.to_string()))?,
            password_hash: PasswordHash::new(row.password_hash.clone())
                .map_err(|err| invalid(err.to_string()))?,
            role: row.role.parse::<Role>().map_err(|err| invalid(err.to_string()))?,
        };
        Ok(User::new(id, account))
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(user: &'a NewUser) -> Self {
        Self {
            username: user.username.as_ref(),
            email: user.email.as_ref(),
            password_hash: user.password_hash.expose(),
            role: user.role.as_str(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = missions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MissionRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}

impl TryFrom<MissionRow> for Mission {
    type Error = InvalidRow;

    fn try_from(row: MissionRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| InvalidRow::new("missions", row.id, reason);
        let status = match row.status.as_str() {
            "open" => MissionStatus::Open,
            "closed" => MissionStatus::Closed,
            other => return Err(invalid(format!("unknown status {other}"))),
        };
        Ok(Mission {
            id: MissionId::new(row.id).map_err(|err| invalid(err.to_string()))?,
            owner_id: UserId::new(row.owner_id).map_err(|err| invalid(err.to_string()))?,
            title: row.title,
            description: row.description,
            start_date: row.start_date,
            end_date: row.end_date,
            status,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = missions)]
pub(crate) struct NewMissionRow<'a> {
    pub owner_id: i64,
    pub title: &'a str,
    pub description: &'a str,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: &'a str,
}

/// Columns named by a mission patch; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = missions)]
pub(crate) struct MissionChangeset<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<&'static str>,
}

impl<'a> From<&'a MissionPatch> for MissionChangeset<'a> {
    fn from(patch: &'a MissionPatch) -> Self {
        Self {
            title: patch.title.as_deref(),
            description: patch.description.as_deref(),
            start_date: patch.start_date,
            end_date: patch.end_date,
            status: patch.status.map(MissionStatus::as_str),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: i64,
    pub volunteer_id: i64,
    pub mission_id: i64,
    pub status: String,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = InvalidRow;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| InvalidRow::new("applications", row.id, reason);
        Ok(Application {
            id: ApplicationId::new(row.id).map_err(|err| invalid(err.to_string()))?,
            volunteer_id: UserId::new(row.volunteer_id).map_err(|err| invalid(err.to_string()))?,
            mission_id: MissionId::new(row.mission_id).map_err(|err| invalid(err.to_string()))?,
            status: row
                .status
                .parse::<ApplicationStatus>()
                .map_err(|err| invalid(err.to_string()))?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub volunteer_id: i64,
    pub mission_id: i64,
    pub status: &'a str,
}
