#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::SystemTime;

use actix_http::Request;
use actix_web::body::{to_bytes, BoxBody};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App, Error};
use campus_backend::entities::{students, users};
use campus_backend::middleware::{RequestTrace, StructuredLogger};
use campus_backend::routes;
use campus_backend::state::app_state::AppState;
use campus_backend::state::security_config::SecurityConfig;
use campus_backend::{mint_access_token, Role};
use once_cell::sync::OnceCell;
use sea_orm::{DatabaseConnection, Value};
use time::OffsetDateTime;
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceCell<()> = OnceCell::new();

pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// Build the full application service around a (usually mock) database
/// connection, with the production middleware stack and routes.
pub async fn build_app(
    db: DatabaseConnection,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    init_logging();
    let state = AppState::new(db, SecurityConfig::default());
    let data = web::Data::new(state);

    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data)
            .configure(routes::configure),
    )
    .await
}

/// Drive a request through the app and read the response as JSON.
///
/// Middleware failures surface as service errors rather than responses,
/// so both arms are rendered through the error boundary the way the
/// HTTP dispatcher would.
pub async fn call_json<S>(app: &S, req: Request) -> (StatusCode, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    match app.call(req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
            (status, json)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = to_bytes(resp.into_body()).await.unwrap();
            let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
            (status, json)
        }
    }
}

/// Assert the standard error envelope shape.
pub fn assert_error_envelope(
    status: StatusCode,
    body: &serde_json::Value,
    expected_status: u16,
    expected_path: &str,
    expected_errors: &[&str],
) {
    assert_eq!(status.as_u16(), expected_status);
    assert_eq!(body["statusCode"], expected_status);
    assert_eq!(body["path"], expected_path);
    assert!(
        body["timestamp"].as_str().is_some_and(|t| !t.is_empty()),
        "timestamp missing from envelope: {body}"
    );
    let errors: Vec<&str> = body["errors"]
        .as_array()
        .unwrap_or_else(|| panic!("errors array missing: {body}"))
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert_eq!(errors, expected_errors);
}

pub fn account(id: i32, role: Role, active: bool, password: &str) -> users::Model {
    let now = OffsetDateTime::now_utc();
    users::Model {
        id,
        name: format!("Account {id}"),
        email: format!("account{id}@example.com"),
        // MIN_COST keeps test setup fast
        password_hash: bcrypt::hash(password, 4).unwrap(),
        active,
        role: role.as_str().to_string(),
        created_at: now,
        updated_at: now,
    }
}

pub fn admin() -> users::Model {
    account(1, Role::Admin, true, "admin123")
}

pub fn regular_user() -> users::Model {
    account(2, Role::User, true, "user123")
}

pub fn student(ra: &str) -> students::Model {
    let now = OffsetDateTime::now_utc();
    students::Model {
        ra: ra.to_string(),
        cpf: format!("{ra}00000"),
        name: format!("Student {ra}"),
        email: format!("student{ra}@example.edu"),
        created_at: now,
        updated_at: now,
    }
}

pub fn token_for(account: &users::Model) -> String {
    mint_access_token(
        &account.id.to_string(),
        &account.name,
        &account.email,
        account.role.parse().unwrap(),
        SystemTime::now(),
        &SecurityConfig::default(),
    )
    .unwrap()
}

pub fn bearer(account: &users::Model) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token_for(account)))
}

/// One COUNT(*) result row, the shape sea-orm's paginator reads.
pub fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
}
