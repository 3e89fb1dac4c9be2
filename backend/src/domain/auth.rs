//! Credential payloads passed from inbound adapters to the account use-cases.
//!
//! Passwords are held in [`Zeroizing`] buffers so plaintext is wiped once the
//! request is done with it.

use std::fmt;

use zeroize::Zeroizing;

use super::Error;

/// Email/password pair submitted at login.
///
/// ## Invariants
/// - `email` is trimmed and lowercased, and non-empty.
/// - `password` is non-empty; surrounding whitespace is preserved.
///
/// # Examples
/// ```
/// use mission_board::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.org ", "pw").unwrap();
/// assert_eq!(creds.email(), "ada@example.org");
/// assert!(LoginCredentials::try_from_parts("ada@example.org", "").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw inputs, failing with `ArgumentRequired` on blanks.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, Error> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(Error::missing_field("email"));
        }
        if password.is_empty() {
            return Err(Error::missing_field("password"));
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw sign-up submission; validated by the account service.
#[derive(Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub role: String,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: Zeroizing::new(password.into()),
            role: role.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}
