//! Account directory over the user repository.
//!
//! Validates account fields and enforces email uniqueness. Password hashing
//! happens before this layer; `register` only ever sees encoded hashes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{UserDirectory, UserPersistenceError, UserRepository};
use crate::domain::{
    Email, Error, NewUser, PasswordHash, Role, SafeUser, User, UserId, Username,
};

pub(crate) fn map_user_persistence_error(err: UserPersistenceError) -> Error {
    match err {
        UserPersistenceError::Duplicate { .. } => {
            Error::data_already_exist("an account with this email already exists")
                .with_details(json!({ "field": "email" }))
        }
        UserPersistenceError::Connection { .. } | UserPersistenceError::Query { .. } => {
            error!(error = %err, "user storage failed");
            Error::storage_failure("account storage is unavailable")
        }
    }
}

/// [`UserDirectory`] backed by a [`UserRepository`].
#[derive(Clone)]
pub struct UserDirectoryService<R> {
    users: Arc<R>,
}

impl<R> UserDirectoryService<R> {
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R> UserDirectory for UserDirectoryService<R>
where
    R: UserRepository,
{
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, Error> {
        self.users
            .find_by_email(email)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)
    }

    async fn register(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<SafeUser, Error> {
        for (field, value) in [
            ("username", username),
            ("email", email),
            ("password", password_hash),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }

        let account = NewUser {
            username: Username::new(username)?,
            email: Email::new(email)?,
            password_hash: PasswordHash::new(password_hash)?,
            role,
        };

        if self.find_by_email(&account.email).await?.is_some() {
            return Err(
                Error::data_already_exist("an account with this email already exists")
                    .with_details(json!({ "field": "email" })),
            );
        }

        let user = self
            .users
            .create(&account)
            .await
            .map_err(map_user_persistence_error)?;
        info!(user_id = %user.id(), role = %user.role(), "account registered");
        Ok(SafeUser::from(&user))
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
