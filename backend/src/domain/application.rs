//! Applications: a volunteer's request to join a mission.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{ApplicationId, Error, MissionId, UserId};

/// Application lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status: {0}")]
pub struct UnknownApplicationStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownApplicationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownApplicationStatus(other.to_owned())),
        }
    }
}

/// Outcome an association may set on an application.
///
/// `pending` is deliberately absent: a decision never returns to pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationDecision {
    Accepted,
    Rejected,
}

impl ApplicationDecision {
    /// Parse a raw decision.
    ///
    /// Missing or blank input fails `ArgumentRequired`; anything other than
    /// `accepted` or `rejected` fails `IncorrectData`.
    ///
    /// # Examples
    /// ```
    /// use mission_board::domain::{ApplicationDecision, ErrorCode};
    ///
    /// assert_eq!(
    ///     ApplicationDecision::parse(Some("accepted")).unwrap(),
    ///     ApplicationDecision::Accepted
    /// );
    /// let err = ApplicationDecision::parse(Some("pending")).unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::IncorrectData);
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, Error> {
        match raw.map(str::trim) {
            None | Some("") => Err(Error::missing_field("status")),
            Some("accepted") => Ok(Self::Accepted),
            Some("rejected") => Ok(Self::Rejected),
            Some(other) => Err(Error::incorrect_data(format!(
                "status must be accepted or rejected, got {other}"
            ))
            .with_details(json!({ "field": "status" }))),
        }
    }
}

impl From<ApplicationDecision> for ApplicationStatus {
    fn from(value: ApplicationDecision) -> Self {
        match value {
            ApplicationDecision::Accepted => Self::Accepted,
            ApplicationDecision::Rejected => Self::Rejected,
        }
    }
}

/// Stored application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub volunteer_id: UserId,
    pub mission_id: MissionId,
    pub status: ApplicationStatus,
}

/// Application awaiting insertion; persistence assigns id and `pending` status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewApplication {
    pub volunteer_id: UserId,
    pub mission_id: MissionId,
}

/// Creation result: the application joined with mission and both parties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub volunteer_id: UserId,
    /// Volunteer's username.
    pub volunteer: String,
    pub mission_id: MissionId,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    /// Owning association's username.
    pub association: String,
    pub status: ApplicationStatus,
}

/// A volunteer's application as listed on their dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerApplicationView {
    pub id: ApplicationId,
    pub mission_id: MissionId,
    pub title: String,
    pub description: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    pub association_id: UserId,
    pub association: String,
    pub status: ApplicationStatus,
    /// Number of applications targeting the same mission.
    pub applications: i64,
}

/// An applicant as seen by the mission owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionApplicationView {
    pub id: ApplicationId,
    pub volunteer_id: UserId,
    pub username: String,
    /// Mission title.
    pub title: String,
    pub status: ApplicationStatus,
}
