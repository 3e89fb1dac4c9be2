//! In-process store implementing every repository port.
//!
//! Used when no database URL is configured and by the behaviour tests. It
//! mirrors the PostgreSQL constraints: unique emails, unique titles per
//! owner, one application per volunteer and mission, and cascading removal
//! of applications when their mission is deleted.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    ApplicationPersistenceError, ApplicationRepository, MissionPersistenceError,
    MissionRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Application, ApplicationId, ApplicationStatus, ApplicationView, Email, Mission,
    MissionApplicationView, MissionId, MissionPatch, MissionStatus, MissionView, NewApplication,
    NewMission, NewUser, User, UserId, VolunteerApplicationView,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    missions: BTreeMap<MissionId, Mission>,
    applications: BTreeMap<ApplicationId, Application>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn username(&self, id: UserId) -> Option<String> {
        self.users
            .get(&id)
            .map(|user| user.username().as_ref().to_owned())
    }

    fn mission_view(&self, mission: &Mission) -> Option<MissionView> {
        let creator = self.username(mission.owner_id)?;
        Some(MissionView::from_mission(mission.clone(), creator))
    }

    fn application_count(&self, mission_id: MissionId) -> i64 {
        let count = self
            .applications
            .values()
            .filter(|application| application.mission_id == mission_id)
            .count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    fn title_taken(&self, owner_id: UserId, title: &str, except: Option<MissionId>) -> bool {
        self.missions.values().any(|mission| {
            mission.owner_id == owner_id && mission.title == title && Some(mission.id) != except
        })
    }

    fn applicant_view(&self, application: &Application) -> Option<MissionApplicationView> {
        let mission = self.missions.get(&application.mission_id)?;
        Some(MissionApplicationView {
            id: application.id,
            volunteer_id: application.volunteer_id,
            username: self.username(application.volunteer_id)?,
            title: mission.title.clone(),
            status: application.status,
        })
    }
}

/// Shared tables guarded by a single lock so cross-table rules stay atomic.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, &'static str> {
        self.tables.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(tables
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock().map_err(UserPersistenceError::connection)?;
        Ok(tables.users.get(&id).cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock().map_err(UserPersistenceError::connection)?;
        if tables.users.values().any(|u| u.email() == &user.email) {
            return Err(UserPersistenceError::duplicate("users_email_key"));
        }
        let raw = tables.next_id();
        let id = UserId::new(raw).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let stored = User::new(id, user.clone());
        tables.users.insert(id, stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl MissionRepository for MemoryStore {
    async fn find_by_id(&self, id: MissionId) -> Result<Option<Mission>, MissionPersistenceError> {
        let tables = self.lock().map_err(MissionPersistenceError::connection)?;
        Ok(tables.missions.get(&id).cloned())
    }

    async fn find_view_by_id(
        &self,
        id: MissionId,
    ) -> Result<Option<MissionView>, MissionPersistenceError> {
        let tables = self.lock().map_err(MissionPersistenceError::connection)?;
        Ok(tables
            .missions
            .get(&id)
            .and_then(|mission| tables.mission_view(mission)))
    }

    async fn find_by_owner_and_title(
        &self,
        owner_id: UserId,
        title: &str,
    ) -> Result<Option<Mission>, MissionPersistenceError> {
        let tables = self.lock().map_err(MissionPersistenceError::connection)?;
        Ok(tables
            .missions
            .values()
            .find(|mission| mission.owner_id == owner_id && mission.title == title)
            .cloned())
    }

    async fn create(&self, mission: &NewMission) -> Result<MissionView, MissionPersistenceError> {
        let mut tables = self.lock().map_err(MissionPersistenceError::connection)?;
        let draft = &mission.draft;
        if tables.title_taken(mission.owner_id, draft.title(), None) {
            return Err(MissionPersistenceError::duplicate(
                "missions_owner_title_key",
            ));
        }
        let Some(creator) = tables.username(mission.owner_id) else {
            return Err(MissionPersistenceError::missing_reference(format!(
                "owner {} does not exist",
                mission.owner_id
            )));
        };
        let raw = tables.next_id();
        let id =
            MissionId::new(raw).map_err(|err| MissionPersistenceError::query(err.to_string()))?;
        let stored = Mission {
            id,
            owner_id: mission.owner_id,
            title: draft.title().to_owned(),
            description: draft.description().to_owned(),
            start_date: draft.start_date(),
            end_date: draft.end_date(),
            status: MissionStatus::Open,
        };
        tables.missions.insert(id, stored.clone());
        Ok(MissionView::from_mission(stored, creator))
    }

    async fn list_by_status(
        &self,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, MissionPersistenceError> {
        let tables = self.lock().map_err(MissionPersistenceError::connection)?;
        Ok(tables
            .missions
            .values()
            .filter(|mission| mission.status == status)
            .filter_map(|mission| tables.mission_view(mission))
            .collect())
    }

    async fn list_by_owner(
        &self,
        owner_id: UserId,
        status: MissionStatus,
    ) -> Result<Vec<MissionView>, MissionPersistenceError> {
        let tables = self.lock().map_err(MissionPersistenceError::connection)?;
        Ok(tables
            .missions
            .values()
            .filter(|mission| mission.owner_id == owner_id && mission.status == status)
            .filter_map(|mission| tables.mission_view(mission))
            .collect())
    }

    async fn update(
        &self,
        id: MissionId,
        patch: &MissionPatch,
    ) -> Result<Option<MissionView>, MissionPersistenceError> {
        let mut tables = self.lock().map_err(MissionPersistenceError::connection)?;
        let Some(stored) = tables.missions.get(&id) else {
            return Ok(None);
        };
        if stored.is_reopened_by(patch) {
            return Err(MissionPersistenceError::stale_status(format!(
                "mission {id}"
            )));
        }
        let merged = stored.merge(patch);
        if merged.end_date < merged.start_date {
            return Err(MissionPersistenceError::query(
                "missions_dates_ordered violated",
            ));
        }
        if tables.title_taken(merged.owner_id, &merged.title, Some(id)) {
            return Err(MissionPersistenceError::duplicate(
                "missions_owner_title_key",
            ));
        }
        let view = tables.mission_view(&merged);
        tables.missions.insert(id, merged);
        Ok(view)
    }

    async fn delete(&self, id: MissionId) -> Result<bool, MissionPersistenceError> {
        let mut tables = self.lock().map_err(MissionPersistenceError::connection)?;
        if tables.missions.remove(&id).is_none() {
            return Ok(false);
        }
        tables
            .applications
            .retain(|_, application| application.mission_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn find_by_id(
        &self,
        id: ApplicationId,
    ) -> Result<Option<Application>, ApplicationPersistenceError> {
        let tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(tables.applications.get(&id).cloned())
    }

    async fn find_by_volunteer_and_mission(
        &self,
        volunteer_id: UserId,
        mission_id: MissionId,
    ) -> Result<Option<Application>, ApplicationPersistenceError> {
        let tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(tables
            .applications
            .values()
            .find(|a| a.volunteer_id == volunteer_id && a.mission_id == mission_id)
            .cloned())
    }

    async fn create(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationView, ApplicationPersistenceError> {
        let mut tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        let exists = tables.applications.values().any(|a| {
            a.volunteer_id == application.volunteer_id && a.mission_id == application.mission_id
        });
        if exists {
            return Err(ApplicationPersistenceError::duplicate(
                "applications_volunteer_mission_key",
            ));
        }
        let Some(mission) = tables.missions.get(&application.mission_id).cloned() else {
            return Err(ApplicationPersistenceError::missing_reference(format!(
                "mission {} does not exist",
                application.mission_id
            )));
        };
        let (Some(volunteer), Some(association)) = (
            tables.username(application.volunteer_id),
            tables.username(mission.owner_id),
        ) else {
            return Err(ApplicationPersistenceError::missing_reference(format!(
                "volunteer {} does not exist",
                application.volunteer_id
            )));
        };
        let raw = tables.next_id();
        let id = ApplicationId::new(raw)
            .map_err(|err| ApplicationPersistenceError::query(err.to_string()))?;
        let stored = Application {
            id,
            volunteer_id: application.volunteer_id,
            mission_id: application.mission_id,
            status: ApplicationStatus::Pending,
        };
        tables.applications.insert(id, stored);

        Ok(ApplicationView {
            id,
            volunteer_id: application.volunteer_id,
            volunteer,
            mission_id: mission.id,
            title: mission.title,
            description: mission.description,
            start_date: mission.start_date,
            end_date: mission.end_date,
            association,
            status: ApplicationStatus::Pending,
        })
    }

    async fn list_for_volunteer(
        &self,
        volunteer_id: UserId,
    ) -> Result<Vec<VolunteerApplicationView>, ApplicationPersistenceError> {
        let tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(tables
            .applications
            .values()
            .filter(|application| application.volunteer_id == volunteer_id)
            .filter_map(|application| {
                let mission = tables.missions.get(&application.mission_id)?;
                Some(VolunteerApplicationView {
                    id: application.id,
                    mission_id: mission.id,
                    title: mission.title.clone(),
                    description: mission.description.clone(),
                    start_date: mission.start_date,
                    end_date: mission.end_date,
                    association_id: mission.owner_id,
                    association: tables.username(mission.owner_id)?,
                    status: application.status,
                    applications: tables.application_count(mission.id),
                })
            })
            .collect())
    }

    async fn list_for_mission(
        &self,
        mission_id: MissionId,
    ) -> Result<Vec<MissionApplicationView>, ApplicationPersistenceError> {
        let tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(tables
            .applications
            .values()
            .filter(|application| application.mission_id == mission_id)
            .filter_map(|application| tables.applicant_view(application))
            .collect())
    }

    async fn update_status(
        &self,
        mission_id: MissionId,
        volunteer_id: UserId,
        status: ApplicationStatus,
    ) -> Result<Option<MissionApplicationView>, ApplicationPersistenceError> {
        let mut tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        let Some(application) = tables
            .applications
            .values_mut()
            .find(|a| a.volunteer_id == volunteer_id && a.mission_id == mission_id)
        else {
            return Ok(None);
        };
        application.status = status;
        let updated = application.clone();
        Ok(tables.applicant_view(&updated))
    }

    async fn delete(&self, id: ApplicationId) -> Result<bool, ApplicationPersistenceError> {
        let mut tables = self.lock().map_err(ApplicationPersistenceError::connection)?;
        Ok(tables.applications.remove(&id).is_some())
    }
}
