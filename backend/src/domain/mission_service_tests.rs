//! Tests for the mission lifecycle engine.

use std::sync::Arc;

use chrono::NaiveDate;
use mockall::predicate::eq;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockMissionRepository;

const OWNER: i64 = 10;
const STRANGER: i64 = 11;

fn user(raw: i64) -> UserId {
    UserId::new(raw).expect("positive id")
}

fn mission_id(raw: i64) -> MissionId {
    MissionId::new(raw).expect("positive id")
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).expect("valid date")
}

#[fixture]
fn open_mission() -> Mission {
    Mission {
        id: mission_id(1),
        owner_id: user(OWNER),
        title: "Beach clean-up".into(),
        description: "Bring gloves".into(),
        start_date: date(1),
        end_date: date(3),
        status: MissionStatus::Open,
    }
}

fn view_of(mission: &Mission) -> MissionView {
    MissionView::from_mission(mission.clone(), "Green Hands")
}

fn service(repo: MockMissionRepository) -> MissionService<MockMissionRepository> {
    MissionService::new(Arc::new(repo))
}

fn draft() -> MissionDraft {
    MissionDraft::new("Beach clean-up", "Bring gloves", date(1), date(3)).expect("valid draft")
}

#[rstest]
#[tokio::test]
async fn create_persists_open_mission(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_owner_and_title()
        .withf(|owner, title| *owner == user(OWNER) && title == "Beach clean-up")
        .times(1)
        .returning(|_, _| Ok(None));
    let view = view_of(&open_mission);
    repo.expect_create()
        .withf(|new| new.owner_id == user(OWNER) && new.draft.title() == "Beach clean-up")
        .times(1)
        .return_once(move |_| Ok(view));

    let created = service(repo)
        .create_mission(user(OWNER), draft())
        .await
        .expect("mission created");
    assert_eq!(created.status, MissionStatus::Open);
    assert_eq!(created.creator, "Green Hands");
}

#[rstest]
#[tokio::test]
async fn create_refuses_duplicate_title_for_owner(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_owner_and_title()
        .return_once(move |_, _| Ok(Some(open_mission)));
    repo.expect_create().times(0);

    let err = service(repo)
        .create_mission(user(OWNER), draft())
        .await
        .expect_err("duplicate title");
    assert_eq!(err.code(), ErrorCode::DataAlreadyExist);
}

#[tokio::test]
async fn create_maps_unique_violation_race() {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_owner_and_title()
        .returning(|_, _| Ok(None));
    repo.expect_create()
        .return_once(|_| Err(MissionPersistenceError::duplicate("missions_owner_title")));

    let err = service(repo)
        .create_mission(user(OWNER), draft())
        .await
        .expect_err("race lost");
    assert_eq!(err.code(), ErrorCode::DataAlreadyExist);
}

#[tokio::test]
async fn create_for_vanished_owner_is_not_found() {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_owner_and_title()
        .returning(|_, _| Ok(None));
    repo.expect_create()
        .return_once(|_| Err(MissionPersistenceError::missing_reference("missions_owner_id_fkey")));

    let err = service(repo)
        .create_mission(user(OWNER), draft())
        .await
        .expect_err("owner gone");
    assert_eq!(err.code(), ErrorCode::DataNotFound);
}

#[tokio::test]
async fn create_maps_connection_failure_to_storage_failure() {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_owner_and_title()
        .return_once(|_, _| Err(MissionPersistenceError::connection("pool timeout")));

    let err = service(repo)
        .create_mission(user(OWNER), draft())
        .await
        .expect_err("storage down");
    assert_eq!(err.code(), ErrorCode::StorageFailure);
    assert!(!err.message().contains("pool timeout"));
}

#[rstest]
#[case(MissionListing::Active, MissionStatus::Open)]
#[case(MissionListing::Archive, MissionStatus::Closed)]
#[tokio::test]
async fn owner_listing_filters_by_supplied_owner(
    #[case] listing: MissionListing,
    #[case] status: MissionStatus,
) {
    let mut repo = MockMissionRepository::new();
    repo.expect_list_by_owner()
        .with(eq(user(OWNER)), eq(status))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let missions = service(repo)
        .list_missions_by_owner(user(OWNER), listing)
        .await
        .expect("listing");
    assert!(missions.is_empty());
}

#[rstest]
#[tokio::test]
async fn open_listing_asks_for_open_missions(open_mission: Mission) {
    let view = view_of(&open_mission);
    let mut repo = MockMissionRepository::new();
    repo.expect_list_by_status()
        .with(eq(MissionStatus::Open))
        .return_once(move |_| Ok(vec![view]));

    let missions = service(repo).list_open_missions().await.expect("listing");
    assert_eq!(missions.len(), 1);
}

#[tokio::test]
async fn update_rejects_empty_patch_before_lookup() {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id().times(0);

    let err = service(repo)
        .update_mission(mission_id(1), user(OWNER), MissionPatch::default())
        .await
        .expect_err("empty patch");
    assert_eq!(err.code(), ErrorCode::ArgumentRequired);
}

#[tokio::test]
async fn update_of_unknown_mission_is_not_found() {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let patch = MissionPatch {
        description: Some("new".into()),
        ..MissionPatch::default()
    };
    let err = service(repo)
        .update_mission(mission_id(99), user(OWNER), patch)
        .await
        .expect_err("unknown mission");
    assert_eq!(err.code(), ErrorCode::DataNotFound);
}

#[rstest]
#[tokio::test]
async fn update_by_non_owner_is_forbidden(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(open_mission)));
    repo.expect_update().times(0);

    let patch = MissionPatch {
        status: Some(MissionStatus::Closed),
        ..MissionPatch::default()
    };
    let err = service(repo)
        .update_mission(mission_id(1), user(STRANGER), patch)
        .await
        .expect_err("not owner");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn closing_a_mission_persists_closed_status(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    let current = open_mission.clone();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_find_by_owner_and_title().times(0);
    let closed = Mission {
        status: MissionStatus::Closed,
        ..open_mission.clone()
    };
    repo.expect_update()
        .withf(|id, patch| {
            *id == mission_id(1)
                && patch.status == Some(MissionStatus::Closed)
                && patch.title.is_none()
                && patch.description.is_none()
        })
        .times(1)
        .return_once(move |_, _| Ok(Some(view_of(&closed))));

    let patch = MissionPatch {
        status: Some(MissionStatus::Closed),
        ..MissionPatch::default()
    };
    let view = service(repo)
        .update_mission(mission_id(1), user(OWNER), patch)
        .await
        .expect("closed");
    assert_eq!(view.status, MissionStatus::Closed);
    assert_eq!(view.title, open_mission.title);
}

#[rstest]
#[tokio::test]
async fn reopening_is_incorrect_data(open_mission: Mission) {
    let closed = Mission {
        status: MissionStatus::Closed,
        ..open_mission
    };
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id().return_once(move |_| Ok(Some(closed)));
    repo.expect_update().times(0);

    let patch = MissionPatch {
        status: Some(MissionStatus::Open),
        ..MissionPatch::default()
    };
    let err = service(repo)
        .update_mission(mission_id(1), user(OWNER), patch)
        .await
        .expect_err("reopen");
    assert_eq!(err.code(), ErrorCode::IncorrectData);
}

#[rstest]
#[tokio::test]
async fn reopening_closed_in_storage_is_incorrect_data(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(open_mission)));
    repo.expect_update()
        .return_once(|id, _| Err(MissionPersistenceError::stale_status(format!("mission {id}"))));

    let patch = MissionPatch {
        status: Some(MissionStatus::Open),
        ..MissionPatch::default()
    };
    let err = service(repo)
        .update_mission(mission_id(1), user(OWNER), patch)
        .await
        .expect_err("closed meanwhile");
    assert_eq!(err.code(), ErrorCode::IncorrectData);
    assert_eq!(err.details(), Some(&serde_json::json!({ "field": "status" })));
}

#[rstest]
#[tokio::test]
async fn update_writes_the_trimmed_patch(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    let renamed = Mission {
        title: "Food bank".into(),
        ..open_mission.clone()
    };
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(open_mission)));
    repo.expect_find_by_owner_and_title()
        .withf(|owner, title| *owner == user(OWNER) && title == "Food bank")
        .return_once(|_, _| Ok(None));
    repo.expect_update()
        .withf(|_, patch| patch.title.as_deref() == Some("Food bank") && patch.status.is_none())
        .times(1)
        .return_once(move |_, _| Ok(Some(view_of(&renamed))));

    let patch = MissionPatch {
        title: Some("  Food bank ".into()),
        ..MissionPatch::default()
    };
    let view = service(repo)
        .update_mission(mission_id(1), user(OWNER), patch)
        .await
        .expect("renamed");
    assert_eq!(view.title, "Food bank");
}

#[rstest]
#[tokio::test]
async fn renaming_onto_sibling_title_conflicts(open_mission: Mission) {
    let sibling = Mission {
        id: mission_id(2),
        title: "Food bank".into(),
        ..open_mission.clone()
    };
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(open_mission)));
    repo.expect_find_by_owner_and_title()
        .withf(|owner, title| *owner == user(OWNER) && title == "Food bank")
        .return_once(move |_, _| Ok(Some(sibling)));
    repo.expect_update().times(0);

    let patch = MissionPatch {
        title: Some("Food bank".into()),
        ..MissionPatch::default()
    };
    let err = service(repo)
        .update_mission(mission_id(1), user(OWNER), patch)
        .await
        .expect_err("title clash");
    assert_eq!(err.code(), ErrorCode::DataAlreadyExist);
}

#[rstest]
#[tokio::test]
async fn delete_returns_removed_mission(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    let current = open_mission.clone();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_delete()
        .with(eq(mission_id(1)))
        .times(1)
        .returning(|_| Ok(true));

    let removed = service(repo)
        .delete_mission(mission_id(1), user(OWNER))
        .await
        .expect("deleted");
    assert_eq!(removed, open_mission);
}

#[rstest]
#[tokio::test]
async fn delete_by_non_owner_is_forbidden(open_mission: Mission) {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(open_mission)));
    repo.expect_delete().times(0);

    let err = service(repo)
        .delete_mission(mission_id(1), user(STRANGER))
        .await
        .expect_err("not owner");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn delete_of_unknown_mission_is_not_found() {
    let mut repo = MockMissionRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = service(repo)
        .delete_mission(mission_id(5), user(OWNER))
        .await
        .expect_err("unknown");
    assert_eq!(err.code(), ErrorCode::DataNotFound);
}
