//! Missions: time-bounded volunteer opportunities posted by associations.
//!
//! A mission starts `open` and may be closed by its owner; closing is
//! terminal. Titles are unique per owner and the end date never precedes the
//! start date.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::{Error, MissionId, UserId};

/// Mission lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    Open,
    Closed,
}

impl MissionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(Error::missing_field("status")),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(Error::incorrect_data(format!("unknown mission status: {other}"))
                .with_details(json!({ "field": "status" }))),
        }
    }
}

/// Which slice of an owner's missions to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionListing {
    /// Missions still open.
    Active,
    /// Missions already closed.
    Archive,
}

impl MissionListing {
    pub const fn status(self) -> MissionStatus {
        match self {
            Self::Active => MissionStatus::Open,
            Self::Archive => MissionStatus::Closed,
        }
    }
}

/// Stored mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub id: MissionId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: MissionStatus,
}

impl Mission {
    pub fn is_open(&self) -> bool {
        self.status == MissionStatus::Open
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owner_id == user
    }

    /// Merge a validated patch, enforcing the state machine and date order.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use mission_board::domain::{Mission, MissionId, MissionPatch, MissionStatus, UserId};
    ///
    /// let mission = Mission {
    ///     id: MissionId::new(1).unwrap(),
    ///     owner_id: UserId::new(2).unwrap(),
    ///     title: "Beach clean-up".into(),
    ///     description: "Bring gloves".into(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    ///     status: MissionStatus::Open,
    /// };
    /// let patch = MissionPatch { status: Some(MissionStatus::Closed), ..MissionPatch::default() };
    /// let closed = mission.apply(&patch).unwrap();
    /// assert_eq!(closed.status, MissionStatus::Closed);
    /// assert!(closed.apply(&MissionPatch {
    ///     status: Some(MissionStatus::Open),
    ///     ..MissionPatch::default()
    /// })
    /// .is_err());
    /// ```
    pub fn apply(&self, patch: &MissionPatch) -> Result<Mission, Error> {
        if self.is_reopened_by(patch) {
            return Err(reopen_refused());
        }
        let updated = self.merge(patch);
        check_date_order(updated.start_date, updated.end_date)?;
        Ok(updated)
    }

    /// Whether `patch` would move this closed mission back to `open`.
    pub fn is_reopened_by(&self, patch: &MissionPatch) -> bool {
        self.status == MissionStatus::Closed && patch.status == Some(MissionStatus::Open)
    }

    /// Overwrite the fields present in `patch` without checking any rule.
    pub fn merge(&self, patch: &MissionPatch) -> Mission {
        let mut merged = self.clone();
        if let Some(title) = &patch.title {
            merged.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            merged.description.clone_from(description);
        }
        if let Some(start_date) = patch.start_date {
            merged.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            merged.end_date = end_date;
        }
        if let Some(status) = patch.status {
            merged.status = status;
        }
        merged
    }
}

pub(crate) fn reopen_refused() -> Error {
    Error::incorrect_data("a closed mission cannot be reopened")
        .with_details(json!({ "field": "status" }))
}

fn check_date_order(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), Error> {
    if end_date < start_date {
        return Err(Error::incorrect_data("end date precedes start date")
            .with_details(json!({ "field": "endDate" })));
    }
    Ok(())
}

fn required_text(field: &str, value: &str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::missing_field(field));
    }
    Ok(trimmed.to_owned())
}

/// Validated content of a mission to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionDraft {
    title: String,
    description: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl MissionDraft {
    /// Fails `ArgumentRequired` on blank text and `IncorrectData` when the
    /// end date precedes the start date.
    pub fn new(
        title: &str,
        description: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, Error> {
        let title = required_text("title", title)?;
        let description = required_text("description", description)?;
        check_date_order(start_date, end_date)?;
        Ok(Self {
            title,
            description,
            start_date,
            end_date,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// Mission ready for insertion; persistence assigns the id and `open` status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMission {
    pub owner_id: UserId,
    pub draft: MissionDraft,
}

/// Partial update; only present fields change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<MissionStatus>,
}

impl MissionPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.status.is_none()
    }

    /// Reject empty patches and blank text fields with `ArgumentRequired`,
    /// returning the patch with its text trimmed.
    pub fn validate(self) -> Result<Self, Error> {
        if self.is_empty() {
            return Err(Error::argument_required("at least one field must be updated"));
        }
        Ok(Self {
            title: self
                .title
                .map(|title| required_text("title", &title))
                .transpose()?,
            description: self
                .description
                .map(|description| required_text("description", &description))
                .transpose()?,
            ..self
        })
    }
}

/// Mission enriched with its creator's username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MissionView {
    pub id: MissionId,
    pub owner_id: UserId,
    #[schema(example = "Green Hands")]
    pub creator: String,
    #[schema(example = "Beach clean-up")]
    pub title: String,
    pub description: String,
    #[schema(value_type = String, format = Date, example = "2025-06-01")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2025-06-02")]
    pub end_date: NaiveDate,
    pub status: MissionStatus,
}

impl MissionView {
    pub fn from_mission(mission: Mission, creator: impl Into<String>) -> Self {
        Self {
            id: mission.id,
            owner_id: mission.owner_id,
            creator: creator.into(),
            title: mission.title,
            description: mission.description,
            start_date: mission.start_date,
            end_date: mission.end_date,
            status: mission.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
    }

    #[fixture]
    fn mission() -> Mission {
        Mission {
            id: MissionId::new(1).expect("id"),
            owner_id: UserId::new(10).expect("id"),
            title: "Beach clean-up".into(),
            description: "Bring gloves".into(),
            start_date: date(1),
            end_date: date(3),
            status: MissionStatus::Open,
        }
    }

    #[rstest]
    #[case("", "desc", "title")]
    #[case("title", "  ", "description")]
    fn draft_requires_text(#[case] title: &str, #[case] description: &str, #[case] field: &str) {
        let err = MissionDraft::new(title, description, date(1), date(2)).expect_err("blank");
        assert_eq!(err.code(), ErrorCode::ArgumentRequired);
        assert_eq!(err.details(), Some(&json!({ "field": field })));
    }

    #[rstest]
    fn draft_rejects_reversed_dates() {
        let err = MissionDraft::new("t", "d", date(5), date(4)).expect_err("reversed");
        assert_eq!(err.code(), ErrorCode::IncorrectData);
    }

    #[rstest]
    fn draft_accepts_single_day_missions() {
        let draft = MissionDraft::new(" t ", "d", date(5), date(5)).expect("same day is fine");
        assert_eq!(draft.title(), "t");
    }

    #[rstest]
    #[case("open", Ok(MissionStatus::Open))]
    #[case("closed", Ok(MissionStatus::Closed))]
    #[case("", Err(ErrorCode::ArgumentRequired))]
    #[case("archived", Err(ErrorCode::IncorrectData))]
    fn status_parsing(#[case] raw: &str, #[case] expected: Result<MissionStatus, ErrorCode>) {
        assert_eq!(raw.parse::<MissionStatus>().map_err(|err| err.code()), expected);
    }

    #[rstest]
    fn empty_patch_is_rejected() {
        let err = MissionPatch::default().validate().expect_err("empty");
        assert_eq!(err.code(), ErrorCode::ArgumentRequired);
    }

    #[rstest]
    fn blank_title_in_patch_is_rejected() {
        let patch = MissionPatch {
            title: Some("  ".into()),
            ..MissionPatch::default()
        };
        assert_eq!(
            patch.validate().map_err(|err| err.code()),
            Err(ErrorCode::ArgumentRequired)
        );
    }

    #[rstest]
    fn validate_trims_present_text() {
        let patch = MissionPatch {
            title: Some("  Food bank ".into()),
            ..MissionPatch::default()
        };
        let validated = patch.validate().expect("valid patch");
        assert_eq!(validated.title.as_deref(), Some("Food bank"));
        assert_eq!(validated.description, None);
    }

    #[rstest]
    fn apply_only_touches_present_fields(mission: Mission) {
        let patch = MissionPatch {
            description: Some("Bring gloves and water".into()),
            ..MissionPatch::default()
        };
        let updated = mission.apply(&patch).expect("valid patch");
        assert_eq!(updated.description, "Bring gloves and water");
        assert_eq!(updated.title, mission.title);
        assert_eq!(updated.status, MissionStatus::Open);
    }

    #[rstest]
    fn apply_checks_merged_dates(mission: Mission) {
        let patch = MissionPatch {
            end_date: Some(date(1)),
            ..MissionPatch::default()
        };
        assert!(mission.apply(&patch).is_ok());

        let patch = MissionPatch {
            start_date: Some(date(4)),
            ..MissionPatch::default()
        };
        let err = mission.apply(&patch).expect_err("start after end");
        assert_eq!(err.code(), ErrorCode::IncorrectData);
    }

    #[rstest]
    fn closed_missions_stay_closed(mission: Mission) {
        let closed = Mission {
            status: MissionStatus::Closed,
            ..mission
        };
        let reopen = MissionPatch {
            status: Some(MissionStatus::Open),
            ..MissionPatch::default()
        };
        let err = closed.apply(&reopen).expect_err("reopen refused");
        assert_eq!(err.code(), ErrorCode::IncorrectData);

        let close_again = MissionPatch {
            status: Some(MissionStatus::Closed),
            ..MissionPatch::default()
        };
        assert!(closed.apply(&close_again).is_ok());
    }

    #[rstest]
    fn view_serialises_dates_as_calendar_days(mission: Mission) {
        let view = MissionView::from_mission(mission, "Green Hands");
        let value = serde_json::to_value(&view).expect("serialise view");
        assert_eq!(value["startDate"], "2025-06-01");
        assert_eq!(value["ownerId"], 10);
        assert_eq!(value["creator"], "Green Hands");
        assert_eq!(value["status"], "open");
    }
}
