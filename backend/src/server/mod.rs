//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{ServerSettings, SettingsError};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use mission_board::Trace;
#[cfg(debug_assertions)]
use mission_board::doc::ApiDoc;
use mission_board::inbound::http::applications::{
    create_application, decide_application, delete_application, list_mission_applications,
    list_my_applications,
};
use mission_board::inbound::http::health::{HealthState, live, ready};
use mission_board::inbound::http::missions::{
    create_mission, delete_mission, list_active_missions, list_archived_missions,
    list_open_missions, update_mission,
};
use mission_board::inbound::http::state::HttpState;
use mission_board::inbound::http::users::{current_user, login, logout, register};
use mission_board::inbound::http::validation::json_config;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Literal mission routes precede `{id}` ones.
    let api = web::scope("/api/v1")
        .wrap(session)
        .service(register)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(list_active_missions)
        .service(list_archived_missions)
        .service(create_mission)
        .service(list_open_missions)
        .service(update_mission)
        .service(delete_mission)
        .service(create_application)
        .service(list_mission_applications)
        .service(decide_application)
        .service(list_my_applications)
        .service(delete_application);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::net::SocketAddr;

    fn deps() -> AppDependencies {
        let config = ServerConfig::new(
            Key::generate(),
            false,
            SameSite::Lax,
            SocketAddr::from(([127, 0, 0, 1], 0)),
        );
        let health_state = web::Data::new(HealthState::new());
        health_state.mark_ready();
        AppDependencies {
            health_state,
            http_state: build_http_state(&config),
            key: config.key,
            cookie_secure: config.cookie_secure,
            same_site: config.same_site,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn health_probes_live_outside_the_api_scope() {
        let app = test::init_service(build_app(deps())).await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request())
                .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn wired_app_serves_a_mission_round_trip() {
        let app = test::init_service(build_app(deps())).await;

        let registered = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users/register")
                .set_json(json!({
                    "username": "Green Hands",
                    "email": "green@example.org",
                    "password": "secret",
                    "role": "association",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(registered.status(), StatusCode::CREATED);

        let login_res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users/login")
                .set_json(json!({"email": "green@example.org", "password": "secret"}))
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
        assert!(login_res.headers().contains_key("trace-id"));
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.into_owned())
            .expect("session cookie");

        let created = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/missions")
                .cookie(cookie.clone())
                .set_json(json!({
                    "title": "Beach clean-up",
                    "description": "Bring gloves",
                    "startDate": "2025-06-01",
                    "endDate": "2025-06-02",
                }))
                .to_request(),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let mine = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/missions/mine")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(mine.status(), StatusCode::OK);
        let body: Value = test::read_body_json(mine).await;
        assert_eq!(body[0]["title"], "Beach clean-up");
        assert_eq!(body[0]["creator"], "Green Hands");
    }
}
