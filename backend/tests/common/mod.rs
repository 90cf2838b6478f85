//! Common test utilities for integration tests
//!
//! Every app runs on an in-memory store with a fixed clock, so tests can
//! move "today" forward by building a second app over the same store.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use habit_tracker_backend::{
    config::AppConfig,
    repositories::InMemoryStore,
    routes,
    state::{AppState, FixedClock},
};
use habit_tracker_shared::DateKey;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Wednesday
pub const TODAY: &str = "2024-05-08";

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Fresh store, clock fixed on [`TODAY`]
    pub fn new() -> Self {
        Self::on(Arc::new(InMemoryStore::new()), TODAY)
    }

    /// App over an existing store with the clock fixed on `today`
    pub fn on(store: Arc<InMemoryStore>, today: &str) -> Self {
        let today: DateKey = today.parse().expect("valid test date");
        let state = AppState::new(
            AppConfig::default(),
            store.clone(),
            Arc::new(FixedClock(today)),
            None,
        );
        let app = routes::create_router(state);

        Self { app, store }
    }

    /// Same store, clock moved to `today`
    pub fn at(&self, today: &str) -> Self {
        Self::on(self.store.clone(), today)
    }

    async fn send(&self, method: &str, path: &str, body: Option<&str>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(path);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.send("GET", path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("POST", path, Some(body)).await
    }

    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("PUT", path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.send("PATCH", path, Some(body)).await
    }

    /// GET expecting 200, parsed as JSON
    pub async fn get_json(&self, path: &str) -> Value {
        let (status, body) = self.get(path).await;
        assert_eq!(status, StatusCode::OK, "GET {path} failed: {body}");
        serde_json::from_str(&body).unwrap()
    }

    /// Create a profile and return its id
    pub async fn create_user(&self, body: Value) -> String {
        let (status, response) = self.post("/api/v1/users", &body.to_string()).await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {response}");
        let response: Value = serde_json::from_str(&response).unwrap();
        response["id"].as_str().unwrap().to_string()
    }

    /// Save a day and return the stored entry
    pub async fn save_day(&self, user_id: &str, date: &str, body: Value) -> Value {
        let path = format!("/api/v1/users/{user_id}/days/{date}");
        let (status, response) = self.put(&path, &body.to_string()).await;
        assert_eq!(status, StatusCode::OK, "save day failed: {response}");
        serde_json::from_str(&response).unwrap()
    }
}

/// Parse a response body
pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}
