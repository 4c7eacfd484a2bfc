#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use captionary_api::auth::session::{SessionStore, SESSION_COOKIE};
use captionary_api::config::{LogFormat, ServerConfig, SessionConfig, StorageBackend};
use captionary_api::gallery::GalleryService;
use captionary_api::router::build_app_router;
use captionary_api::state::AppState;
use captionary_core::cache::ReadCache;
use captionary_db::seed::seed_images;
use captionary_db::MemoryStore;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

/// Build a test `ServerConfig` with the in-memory backend.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        session: SessionConfig {
            secret: "integration-test-secret".to_string(),
            ttl_hours: 24,
        },
        cache_ttl_secs: 60,
        password_min_length: 8,
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/../../static").to_string(),
        log_format: LogFormat::Pretty,
    }
}

/// Router plus handles on the state behind it.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over a seeded `MemoryStore`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so every test goes
/// through the production middleware stack.
pub async fn build_test_app() -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    seed_images(&*store).await.expect("seeding should succeed");

    let gallery = GalleryService::new(
        store.clone(),
        Arc::new(ReadCache::new(config.cache_ttl())),
        config.password_min_length,
    );
    let state = AppState {
        gallery: Arc::new(gallery),
        sessions: Arc::new(SessionStore::new(&config.session)),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        store,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("router is infallible")
}

fn builder(method: &str, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match cookie {
        Some(cookie) => builder.header(COOKIE, cookie),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    get_with_cookie(app, uri, None).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: Option<&str>) -> Response<Body> {
    let request = builder("GET", uri, cookie).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    cookie: Option<&str>,
) -> Response<Body> {
    let request = builder("POST", uri, cookie)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_raw_json(
    app: Router,
    uri: &str,
    body: &'static str,
    cookie: Option<&str>,
) -> Response<Body> {
    let request = builder("POST", uri, cookie)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// POST an `application/x-www-form-urlencoded` body. Values must not need escaping
/// beyond spaces.
pub async fn post_form(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    cookie: Option<&str>,
) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{k}={}", v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&");
    let request = builder("POST", uri, cookie)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{SESSION_COOKIE}=")))
        .map(str::to_string)
}

pub fn is_html(response: &Response<Body>) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

pub async fn register(app: Router, user_name: &str) -> Response<Body> {
    let email = format!("{user_name}@example.com");
    post_form(
        app,
        "/register",
        &[("userName", user_name), ("email", &email), ("password", PASSWORD)],
        None,
    )
    .await
}

/// Log in and return the `name=value` pair to send back as a `Cookie` header.
pub async fn login(app: Router, user_name: &str, password: &str) -> Option<String> {
    let response = post_form(
        app,
        "/login",
        &[("userName", user_name), ("password", password)],
        None,
    )
    .await;
    if response.status() != StatusCode::SEE_OTHER {
        return None;
    }
    set_cookie(&response).map(|header| {
        header
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    })
}

/// Register `user_name` and log in, returning the session cookie.
pub async fn register_and_login(test: &TestApp, user_name: &str) -> String {
    let response = register(test.app(), user_name).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    login(test.app(), user_name, PASSWORD)
        .await
        .expect("login should succeed")
}
