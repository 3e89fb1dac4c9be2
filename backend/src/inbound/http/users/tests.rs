//! Tests for account API handlers.

use super::*;
use crate::domain::{Error, Role, UserId};
use crate::inbound::http::test_utils::{MockPorts, session_cookie, test_session_middleware};
use crate::inbound::http::validation::json_config;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use mockall::predicate::eq;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn ada() -> SafeUser {
    SafeUser {
        id: UserId::new(7).expect("fixture id"),
        username: "ada".into(),
        email: "ada@example.org".into(),
        role: Role::Volunteer,
    }
}

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(register)
                .service(login)
                .service(logout)
                .service(current_user),
        )
}

async fn error_code(response: actix_web::dev::ServiceResponse) -> String {
    let value: Value = actix_test::read_body_json(response).await;
    value
        .get("code")
        .and_then(Value::as_str)
        .expect("code present")
        .to_owned()
}

#[rstest]
#[actix_web::test]
async fn register_returns_created_safe_user(ada: SafeUser) {
    let mut ports = MockPorts::default();
    let created = ada.clone();
    ports
        .accounts
        .expect_sign_up()
        .withf(|registration| {
            registration.email == "ada@example.org" && registration.role == "volunteer"
        })
        .times(1)
        .returning(move |_| Ok(created.clone()));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(json!({
                "username": "ada",
                "email": "ada@example.org",
                "password": "correct horse",
                "role": "volunteer",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        json!({"id": 7, "username": "ada", "email": "ada@example.org", "role": "volunteer"})
    );
    assert!(body.get("passwordHash").is_none());
}

#[rstest]
#[case(Error::data_already_exist("email taken"), StatusCode::CONFLICT, "data_already_exist")]
#[case(Error::missing_field("role"), StatusCode::BAD_REQUEST, "argument_required")]
#[case(Error::incorrect_data("unknown role"), StatusCode::UNPROCESSABLE_ENTITY, "incorrect_data")]
#[actix_web::test]
async fn register_surfaces_domain_failures(
    #[case] failure: Error,
    #[case] status: StatusCode,
    #[case] code: &str,
) {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_sign_up()
        .returning(move |_| Err(failure.clone()));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/register")
            .set_json(json!({"username": "ada"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), status);
    assert_eq!(error_code(response).await, code);
}

#[rstest]
#[actix_web::test]
async fn malformed_bodies_are_incorrect_data() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[rstest]
#[case(json!({"password": "pw"}), "email")]
#[case(json!({"email": "ada@example.org", "password": "  "}), "password")]
#[actix_web::test]
async fn login_requires_both_fields(#[case] payload: Value, #[case] field: &str) {
    // No expectation on the mock: reaching the service would panic.
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn login_opens_a_session_used_by_me(ada: SafeUser) {
    let mut ports = MockPorts::default();
    let signed_in = ada.clone();
    ports
        .accounts
        .expect_authenticate()
        .withf(|credentials| {
            credentials.email() == "ada@example.org" && credentials.password() == "pw"
        })
        .times(1)
        .returning(move |_| Ok(signed_in.clone()));
    let current = ada.clone();
    ports
        .accounts
        .expect_current_user()
        .with(eq(ada.id))
        .times(1)
        .returning(move |_| Ok(current.clone()));
    let app = actix_test::init_service(test_app(ports)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({"email": " ADA@example.org ", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: SafeUserJson = actix_test::read_body_json(me).await;
    assert_eq!(body.username, "ada");
}

#[derive(serde::Deserialize)]
struct SafeUserJson {
    username: String,
}

#[rstest]
#[actix_web::test]
async fn wrong_credentials_are_incorrect_data() {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_authenticate()
        .returning(|_| Err(Error::incorrect_data("invalid email or password")));
    let app = actix_test::init_service(test_app(ports)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({"email": "ada@example.org", "password": "nope"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        response
            .response()
            .cookies()
            .all(|cookie| cookie.name() != "session")
    );
}

#[rstest]
#[actix_web::test]
async fn me_without_session_is_unauthorised() {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(response).await, "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn logout_clears_the_session(ada: SafeUser) {
    let mut ports = MockPorts::default();
    ports
        .accounts
        .expect_authenticate()
        .returning(move |_| Ok(ada.clone()));
    let app = actix_test::init_service(test_app(ports)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/login")
            .set_json(json!({"email": "ada@example.org", "password": "pw"}))
            .to_request(),
    )
    .await;
    let logout_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/logout")
            .cookie(session_cookie(&login_res))
            .to_request(),
    )
    .await;
    assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);

    let me = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me")
            .cookie(session_cookie(&logout_res))
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}
