//! Builders for the HTTP state over Diesel or in-memory repositories.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use mission_board::inbound::http::state::HttpState;
use mission_board::outbound::memory::MemoryStore;
use mission_board::outbound::persistence::{
    DbPool, DieselApplicationRepository, DieselMissionRepository, DieselUserRepository,
};
use mission_board::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Wire the use-case services over the configured storage.
///
/// A database pool selects the Diesel repositories; without one all three
/// repository ports share a single [`MemoryStore`] so cascades and joins see
/// the same data.
pub(crate) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => diesel_state(pool, hasher),
        None => {
            info!("no database configured; using in-memory store");
            let store = Arc::new(MemoryStore::new());
            HttpState::from_repositories(store.clone(), store.clone(), store, hasher)
        }
    };
    web::Data::new(state)
}

fn diesel_state(pool: &DbPool, hasher: Arc<Argon2PasswordHasher>) -> HttpState {
    HttpState::from_repositories(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselMissionRepository::new(pool.clone())),
        Arc::new(DieselApplicationRepository::new(pool.clone())),
        hasher,
    )
}
