#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum_extra::extract::cookie::Cookie;
use carepoint::cli::create_admin;
use carepoint::router::init_router;
use carepoint::state::AppState;
use carepoint_config::{CookieConfig, CorsConfig, JwtConfig};
use carepoint_db::InMemoryUserRepository;
use carepoint_media::FakeMediaHost;
use carepoint_models::{Gender, RegisterUserDto, User, UserRole};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const PASSWORD: &str = "pw123456";
const BOUNDARY: &str = "carepoint-test-boundary";

#[derive(Clone)]
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub media: Arc<FakeMediaHost>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `Set-Cookie` entry for `name`, if the response sets one.
    pub fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|value| Cookie::parse(value.to_owned()).ok())
            .find(|cookie| cookie.name() == name)
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

pub fn setup_test_app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    let media = Arc::new(FakeMediaHost::new());

    let state = AppState::new(
        users.clone(),
        media.clone(),
        &JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            expiry_days: 7,
        },
        CookieConfig::default(),
        CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
    );

    TestApp {
        router: init_router(state.clone()),
        state,
        users,
        media,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Registers a patient through the API and returns the session token.
    pub async fn register_patient(&self, email: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/v1/user/patient/register",
                patient_form(email),
                None,
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        response.body["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str, role: &str) -> TestResponse {
        self.send(json_request(
            "POST",
            "/api/v1/user/login",
            json!({ "email": email, "password": password, "role": role }),
            None,
        ))
        .await
    }

    /// Creates an admin the way the CLI does and returns it with a session
    /// token for the `adminToken` cookie.
    pub async fn seed_admin(&self, email: &str) -> (User, String) {
        let admin = create_admin(&*self.users, registration(email))
            .await
            .unwrap();
        let issued = self.state.tokens.issue(admin.id, UserRole::Admin).unwrap();

        (admin, issued.token)
    }
}

pub fn registration(email: &str) -> RegisterUserDto {
    RegisterUserDto {
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some(email.to_string()),
        phone: Some("03001234567".to_string()),
        nic: Some("3520212345671".to_string()),
        dob: NaiveDate::from_ymd_opt(1990, 12, 10),
        gender: Some(Gender::Female),
        password: Some(PASSWORD.to_string()),
    }
}

pub fn patient_form(email: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "phone": "03001234567",
        "nic": "3520212345671",
        "dob": "1990-12-10",
        "gender": "Female",
        "password": PASSWORD
    })
}

pub fn doctor_fields(email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("firstName", "Gregory".to_string()),
        ("lastName", "House".to_string()),
        ("email", email.to_string()),
        ("phone", "5550100".to_string()),
        ("nic", "1234567890123".to_string()),
        ("dob", "1959-06-11".to_string()),
        ("gender", "Male".to_string()),
        ("password", PASSWORD.to_string()),
        ("doctorDepartment", "Diagnostics".to_string()),
    ]
}

/// `(cookie name, token)` sent as the `Cookie` header.
pub type SessionCookie<'a> = Option<(&'a str, &'a str)>;

fn with_cookie(
    builder: axum::http::request::Builder,
    cookie: SessionCookie<'_>,
) -> axum::http::request::Builder {
    match cookie {
        Some((name, token)) => builder.header(header::COOKIE, format!("{name}={token}")),
        None => builder,
    }
}

pub fn json_request(method: &str, uri: &str, body: Value, cookie: SessionCookie<'_>) -> Request<Body> {
    with_cookie(Request::builder().method(method).uri(uri), cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, cookie: SessionCookie<'_>) -> Request<Body> {
    with_cookie(Request::builder().method("GET").uri(uri), cookie)
        .body(Body::empty())
        .unwrap()
}

/// A `multipart/form-data` request with text `fields` and an optional
/// `docAvatar` file given as `(file name, content type, bytes)`.
pub fn multipart_request(
    uri: &str,
    fields: &[(&str, String)],
    avatar: Option<(&str, &str, &[u8])>,
    cookie: SessionCookie<'_>,
) -> Request<Body> {
    let mut body = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    if let Some((file_name, content_type, bytes)) = avatar {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"docAvatar\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    with_cookie(Request::builder().method("POST").uri(uri), cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub const PNG_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00];
