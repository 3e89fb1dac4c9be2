//! Internal port over stored accounts used by the account use-cases.

use async_trait::async_trait;

use crate::domain::{Email, Error, Role, SafeUser, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, Error>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error>;

    /// Store an account whose password is already hashed.
    async fn register(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<SafeUser, Error>;
}
