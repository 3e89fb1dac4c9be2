//! Domain entities, use-cases, and ports.
//!
//! Nothing here imports an adapter. Use-cases return `Result<T, Error>`
//! where [`Error`] carries one [`ErrorCode`] from the failure taxonomy.
//!
//! Public surface:
//! - Accounts: [`User`], [`SafeUser`], [`project`], [`Role`], [`Actor`].
//! - Missions: [`Mission`], [`MissionDraft`], [`MissionPatch`], [`MissionView`].
//! - Applications: [`Application`], [`ApplicationDecision`] and the views.
//! - Services: [`AccountService`], [`UserDirectoryService`],
//!   [`MissionService`], [`ApplicationService`].

pub mod account_service;
pub mod application;
pub mod application_service;
pub mod auth;
pub mod error;
pub mod identity;
pub mod ids;
pub mod mission;
pub mod mission_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_directory_service;

pub use self::account_service::AccountService;
pub use self::application::{
    Application, ApplicationDecision, ApplicationStatus, ApplicationView,
    MissionApplicationView, NewApplication, UnknownApplicationStatus, VolunteerApplicationView,
};
pub use self::application_service::ApplicationService;
pub use self::auth::{LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::Actor;
pub use self::ids::{ApplicationId, InvalidId, MissionId, UserId};
pub use self::mission::{
    Mission, MissionDraft, MissionListing, MissionPatch, MissionStatus, MissionView, NewMission,
};
pub use self::mission_service::MissionService;
pub use self::trace_id::TraceId;
pub use self::user::{
    Email, NewUser, PasswordHash, Role, SafeUser, User, UserValidationError, Username, project,
};
pub use self::user_directory_service::UserDirectoryService;

/// Convenient use-case result alias.
///
/// # Examples
/// ```
/// use mission_board::domain::{DomainResult, Error};
///
/// fn refuse() -> DomainResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(refuse().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
