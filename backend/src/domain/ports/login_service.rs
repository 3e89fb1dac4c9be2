//! Driving port for account use-cases: sign-up, login, and session lookup.
//!
//! Inbound adapters call it without knowing how passwords are hashed or where
//! accounts live, so handler tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, SafeUser, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Register a new account.
    ///
    /// Fails `ArgumentRequired` on blank fields, `IncorrectData` on an unknown
    /// role or malformed email, and `DataAlreadyExist` when the email is taken.
    async fn sign_up(&self, registration: &Registration) -> Result<SafeUser, Error>;

    /// Check credentials; any mismatch fails `IncorrectData`.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<SafeUser, Error>;

    /// Resolve the account behind a session; `Unauthorized` if it is gone.
    async fn current_user(&self, id: UserId) -> Result<SafeUser, Error>;
}
