//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries the authenticated `(id, role)` pair; handlers only ever
//! see it as a domain [`Actor`].

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::{error, warn};

use crate::domain::{Actor, Error, Role, SafeUser, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the signed-in account's identity and rotate the session id.
    pub fn persist(&self, user: &SafeUser) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, user.id.get())
            .and_then(|()| self.0.insert(ROLE_KEY, user.role.as_str()))
            .map_err(|err| {
                error!(error = %err, "failed to persist session");
                Error::storage_failure("failed to persist session")
            })
    }

    /// The identity in the cookie, if present and well formed.
    ///
    /// Tampered or stale values are logged and treated as absent.
    pub fn actor(&self) -> Option<Actor> {
        let id = self.0.get::<i64>(USER_ID_KEY);
        let role = self.0.get::<String>(ROLE_KEY);
        match (id, role) {
            (Ok(Some(raw_id)), Ok(Some(raw_role))) => {
                match (UserId::new(raw_id), raw_role.parse::<Role>()) {
                    (Ok(id), Ok(role)) => Some(Actor::new(id, role)),
                    _ => {
                        warn!(raw_id, raw_role = %raw_role, "invalid identity in session cookie");
                        None
                    }
                }
            }
            (Ok(None), _) | (_, Ok(None)) => None,
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "unreadable session cookie");
                None
            }
        }
    }

    /// Require an authenticated identity or fail `Unauthorized`.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        self.actor()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require an authenticated identity holding `role`.
    ///
    /// `Unauthorized` without a session, `Forbidden` with the wrong role.
    pub fn require_role(&self, role: Role) -> Result<Actor, Error> {
        let actor = self.require_actor()?;
        actor.require(role)?;
        Ok(actor)
    }

    /// Drop every session value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
