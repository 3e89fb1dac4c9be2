//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (repositories, password hashing) are implemented by outbound
//! adapters; driving ports (account, mission, and application use-cases) are
//! called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod application_lifecycle;
mod application_repository;
mod login_service;
mod mission_lifecycle;
mod mission_repository;
mod password_hasher;
mod user_directory;
mod user_repository;

pub use application_lifecycle::ApplicationLifecycle;
#[cfg(test)]
pub use application_lifecycle::MockApplicationLifecycle;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationPersistenceError, ApplicationRepository};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use mission_lifecycle::MissionLifecycle;
#[cfg(test)]
pub use mission_lifecycle::MockMissionLifecycle;
#[cfg(test)]
pub use mission_repository::MockMissionRepository;
pub use mission_repository::{MissionPersistenceError, MissionRepository};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
