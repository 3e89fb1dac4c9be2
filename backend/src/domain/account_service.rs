//! Account use-cases: sign-up, login, and session lookup.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{LoginService, PasswordHashError, PasswordHasher, UserDirectory};
use crate::domain::{Email, Error, LoginCredentials, Registration, Role, SafeUser, UserId};

const INVALID_CREDENTIALS: &str = "invalid email or password";

fn map_hash_error(err: PasswordHashError) -> Error {
    error!(error = %err, "password hashing failed");
    Error::storage_failure("credentials could not be processed")
}

/// [`LoginService`] over the account directory and a password hasher.
#[derive(Clone)]
pub struct AccountService<D, H> {
    directory: Arc<D>,
    hasher: Arc<H>,
}

impl<D, H> AccountService<D, H> {
    /// Create a new service over the account directory and password hasher.
    pub fn new(directory: Arc<D>, hasher: Arc<H>) -> Self {
        Self { directory, hasher }
    }
}

impl<D, H> AccountService<D, H>
where
    H: PasswordHasher + 'static,
{
    /// Run `work` against the hasher on the blocking thread pool.
    async fn off_worker<T, F>(&self, work: F) -> Result<T, Error>
    where
        F: FnOnce(&H) -> Result<T, PasswordHashError> + Send + 'static,
        T: Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || work(&hasher))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task did not complete");
                Error::storage_failure("credentials could not be processed")
            })?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<D, H> LoginService for AccountService<D, H>
where
    D: UserDirectory,
    H: PasswordHasher + 'static,
{
    async fn sign_up(&self, registration: &Registration) -> Result<SafeUser, Error> {
        let Registration {
            username,
            email,
            password,
            role,
        } = registration;
        for (field, value) in [
            ("username", username.as_str()),
            ("email", email.as_str()),
            ("password", password.as_str()),
            ("role", role.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(Error::missing_field(field));
            }
        }
        let role: Role = role.parse()?;
        // Reject malformed addresses before paying for a hash.
        let email = Email::new(email)?;

        let password = password.clone();
        let hash = self
            .off_worker(move |hasher| hasher.hash(password.as_str()))
            .await?;
        self.directory
            .register(username, email.as_ref(), hash.expose(), role)
            .await
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<SafeUser, Error> {
        let Ok(email) = Email::new(credentials.email()) else {
            return Err(Error::incorrect_data(INVALID_CREDENTIALS));
        };
        let Some(user) = self.directory.find_by_email(&email).await? else {
            warn!("login attempt for unknown account");
            return Err(Error::incorrect_data(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let stored = user.password_hash().clone();
        let verified = self
            .off_worker(move |hasher| hasher.verify(password.as_str(), &stored))
            .await?;
        if !verified {
            warn!(user_id = %user.id(), "login attempt with wrong password");
            return Err(Error::incorrect_data(INVALID_CREDENTIALS));
        }

        info!(user_id = %user.id(), "login succeeded");
        Ok(SafeUser::from(&user))
    }

    async fn current_user(&self, id: UserId) -> Result<SafeUser, Error> {
        self.directory
            .find_by_id(id)
            .await?
            .map(|user| SafeUser::from(&user))
            .ok_or_else(|| Error::unauthorized("session account no longer exists"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
