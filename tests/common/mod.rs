#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test, web, App};
use serde_json::{json, Value};
use taskboard::auth::{AuthResponse, AuthSettings};
use taskboard::routes;
use taskboard::state::AppState;

pub const PASSWORD: &str = "Password123!";
pub const ADMIN_EMAIL: &str = "admin@example.com";

pub fn settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "integration_test_secret".into(),
        jwt_expiration_hours: 1,
        // bcrypt's minimum cost keeps the suite fast.
        bcrypt_cost: 4,
        admin_email: Some(ADMIN_EMAIL.into()),
    }
}

pub async fn init_app() -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    let state = web::Data::new(AppState::in_memory(settings()));
    test::init_service(
        App::new()
            .app_data(state)
            .configure(routes::configure_app),
    )
    .await
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Registers `username` with `<username>@example.com` and returns the auth response.
pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
) -> AuthResponse {
    register_with_email(app, username, &format!("{}@example.com", username)).await
}

pub async fn register_with_email(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    email: &str,
) -> AuthResponse {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "firstName": "Test",
            "lastName": username,
            "username": username,
            "email": email,
            "password": PASSWORD
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Registration of {} failed. Body: {:?}",
        username,
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse registration response")
}

/// Sends a JSON request with a bearer token and returns status and parsed body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
    token: &str,
) -> (actix_web::http::StatusCode, Value) {
    let resp = test::call_service(app, req.insert_header(bearer(token)).to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("Response body is not JSON")
    };
    (status, value)
}
