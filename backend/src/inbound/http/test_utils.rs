//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{MockApplicationLifecycle, MockLoginService, MockMissionLifecycle};
use crate::domain::{Error, Role, SafeUser, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path of the test-only route that signs a caller in without credentials.
pub const SIGN_IN_PATH: &str = "/test/sign-in/{id}/{role}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The `session` cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Driving-port mocks bundled so each test only primes what it calls.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockLoginService,
    pub missions: MockMissionLifecycle,
    pub applications: MockApplicationLifecycle,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.accounts),
            Arc::new(self.missions),
            Arc::new(self.applications),
        )
    }
}

async fn sign_in(session: SessionContext, path: web::Path<(i64, String)>) -> Result<HttpResponse, Error> {
    let (raw_id, raw_role) = path.into_inner();
    let role: Role = raw_role.parse()?;
    let user = SafeUser {
        id: UserId::new(raw_id).expect("positive id"),
        username: format!("user-{raw_id}"),
        email: format!("user-{raw_id}@example.org"),
        role,
    };
    session.persist(&user)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Route to mount at [`SIGN_IN_PATH`].
pub fn sign_in_route() -> actix_web::Route {
    web::get().to(sign_in)
}

/// Session cookie for user `id` holding `role`, via [`sign_in_route`].
pub async fn cookie_for<S>(app: &S, id: i64, role: Role) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let uri = format!("/test/sign-in/{id}/{role}");
    let response = test::call_service(app, test::TestRequest::get().uri(&uri).to_request()).await;
    session_cookie(&response)
}
