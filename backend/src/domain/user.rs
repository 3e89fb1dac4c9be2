//! Account model and the password-free projection handed to callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Error, UserId};

/// Validation failures for account fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("username is required")]
    EmptyUsername,
    #[error("email is required")]
    EmptyEmail,
    #[error("email address is malformed")]
    InvalidEmail,
    #[error("password hash is required")]
    EmptyPasswordHash,
    #[error("role is required")]
    EmptyRole,
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl UserValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyEmail | Self::InvalidEmail => "email",
            Self::EmptyPasswordHash => "password",
            Self::EmptyRole | Self::UnknownRole(_) => "role",
        }
    }
}

impl From<UserValidationError> for Error {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::EmptyUsername
            | UserValidationError::EmptyEmail
            | UserValidationError::EmptyPasswordHash
            | UserValidationError::EmptyRole => Error::missing_field(value.field()),
            UserValidationError::InvalidEmail | UserValidationError::UnknownRole(_) => {
                Error::incorrect_data(value.to_string())
                    .with_details(serde_json::json!({ "field": value.field() }))
            }
        }
    }
}

/// Account capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Applies to missions.
    Volunteer,
    /// Posts missions and decides on applications.
    Association,
}

impl Role {
    /// Lowercase wire and storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Volunteer => "volunteer",
            Self::Association => "association",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(UserValidationError::EmptyRole),
            "volunteer" => Ok(Self::Volunteer),
            "association" => Ok(Self::Association),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Display name chosen at registration; trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Login address; trimmed, lowercased, and shaped like `local@domain`.
///
/// # Examples
/// ```
/// use mission_board::domain::Email;
///
/// let email = Email::new("  Ada@Example.org ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.org");
/// assert!(Email::new("ada.example.org").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        let well_formed = match normalised.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.is_empty()
                    && !domain.contains('@')
                    && !normalised.contains(char::is_whitespace)
            }
            None => false,
        };
        if !well_formed {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoded password hash. Never serialised; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Encoded form for storage and verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Validated account awaiting an identifier from persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub role: Role,
}

/// Stored account, password hash included.
///
/// Accounts are immutable after registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: Email,
    password_hash: PasswordHash,
    role: Role,
}

impl User {
    pub fn new(id: UserId, account: NewUser) -> Self {
        let NewUser {
            username,
            email,
            password_hash,
            role,
        } = account;
        Self {
            id,
            username,
            email,
            password_hash,
            role,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

/// Account as exposed outside the core: every field except the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SafeUser {
    pub id: UserId,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.org")]
    pub email: String,
    pub role: Role,
}

impl From<&User> for SafeUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
            email: user.email.to_string(),
            role: user.role,
        }
    }
}

/// Strip credentials from an optional account.
///
/// # Examples
/// ```
/// use mission_board::domain::project;
///
/// assert!(project(None).is_none());
/// ```
pub fn project(user: Option<&User>) -> Option<SafeUser> {
    user.map(SafeUser::from)
}
