#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use chrono::Duration;
use serde_json::Value;
use sleepos::config::StoreConfig;
use sleepos::gateway::Gateway;
use sleepos::server::{AppState, create_router};
use sleepos::store::{SqliteStore, Store};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@sleepos.org";
pub const ADMIN_PASSWORD: &str = "night-mode-2024";

pub struct TestApp {
    pub router: Router,
    pub gateway: Gateway,
}

impl TestApp {
    /// App over a fresh in-memory database with a seeded admin account.
    pub async fn new() -> Self {
        let store = SqliteStore::in_memory().expect("open store");
        store.initialize().expect("create schema");
        let store: Arc<dyn Store> = Arc::new(store);

        let gateway = Gateway::new(Arc::clone(&store));
        gateway
            .seed_admin(ADMIN_EMAIL.to_string(), ADMIN_PASSWORD.to_string())
            .await
            .expect("seed admin");

        let state = Arc::new(AppState::with_store(store, Duration::hours(12)));
        Self {
            router: create_router(state),
            gateway,
        }
    }

    /// App whose store settings are missing.
    pub fn unconfigured() -> Router {
        let state = Arc::new(AppState::new(StoreConfig::default(), Duration::hours(12)));
        create_router(state)
    }

    pub async fn login(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({
                    "email": ADMIN_EMAIL,
                    "password": ADMIN_PASSWORD,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token").to_string()
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, token, body).await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    send_request(router, request).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

pub fn device_body(name: &str, codename: &str) -> Value {
    serde_json::json!({ "name": name, "codename": codename })
}

pub fn rom_body(version: &str) -> Value {
    serde_json::json!({
        "romType": "SleepOS",
        "version": version,
        "size": "1.8 GB",
        "maintainer": "alice",
        "downloadUrl": format!("https://dl.sleepos.org/panther/{version}.zip"),
        "changelog": "Initial build",
    })
}
