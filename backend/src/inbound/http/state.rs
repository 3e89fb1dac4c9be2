//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ApplicationLifecycle, ApplicationRepository, LoginService, MissionLifecycle,
    MissionRepository, PasswordHasher, UserRepository,
};
use crate::domain::{AccountService, ApplicationService, MissionService, UserDirectoryService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn LoginService>,
    pub missions: Arc<dyn MissionLifecycle>,
    pub applications: Arc<dyn ApplicationLifecycle>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn LoginService>,
        missions: Arc<dyn MissionLifecycle>,
        applications: Arc<dyn ApplicationLifecycle>,
    ) -> Self {
        Self {
            accounts,
            missions,
            applications,
        }
    }

    /// Wire the domain services over concrete repository adapters.
    ///
    /// The application engine reaches missions through the same
    /// [`MissionService`] the handlers use.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mission_board::inbound::http::state::HttpState;
    /// use mission_board::outbound::memory::MemoryStore;
    /// use mission_board::outbound::security::Argon2PasswordHasher;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let state = HttpState::from_repositories(
    ///     store.clone(),
    ///     store.clone(),
    ///     store,
    ///     Arc::new(Argon2PasswordHasher::new()),
    /// );
    /// let _accounts = state.accounts.clone();
    /// ```
    pub fn from_repositories<U, M, A, H>(
        users: Arc<U>,
        missions: Arc<M>,
        applications: Arc<A>,
        hasher: Arc<H>,
    ) -> Self
    where
        U: UserRepository + 'static,
        M: MissionRepository + 'static,
        A: ApplicationRepository + 'static,
        H: PasswordHasher + 'static,
    {
        let directory = Arc::new(UserDirectoryService::new(users));
        let mission_service = Arc::new(MissionService::new(missions));
        Self {
            accounts: Arc::new(AccountService::new(directory, hasher)),
            missions: mission_service.clone(),
            applications: Arc::new(ApplicationService::new(mission_service, applications)),
        }
    }
}
