//! Authenticated caller identity.

use super::{Error, Role, UserId};

/// The `(id, role)` pair established by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Fail with `Forbidden` unless the caller holds `role`.
    ///
    /// # Examples
    /// ```
    /// use mission_board::domain::{Actor, Role, UserId};
    ///
    /// let actor = Actor::new(UserId::new(1).unwrap(), Role::Volunteer);
    /// assert!(actor.require(Role::Volunteer).is_ok());
    /// assert!(actor.require(Role::Association).is_err());
    /// ```
    pub fn require(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.id, role = %self.role, required = %role, "role refused");
            Err(Error::forbidden(format!("this action requires the {role} role")))
        }
    }
}
