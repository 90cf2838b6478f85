//! Integration tests for body measurement endpoints

mod common;

use axum::http::StatusCode;
use common::{json, TestApp, TODAY};
use serde_json::json;

#[tokio::test]
async fn test_save_normalizes_and_merges() {
    let app = TestApp::new();
    let user = app.create_user(json!({ "name": "Anna" })).await;
    let path = format!("/api/v1/users/{user}/measurements/{TODAY}");

    let (status, body) = app
        .put(&path, &json!({ "weight": "71,2", "waist": "", "comment": " morning " }).to_string())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body),
        json!({ "date": TODAY, "weight": 71.2, "comment": "morning" })
    );

    // Second save the same day only adds fields
    let (status, body) = app.put(&path, &json!({ "hips": 98 }).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["weight"], 71.2);
    assert_eq!(body["hips"], 98.0);

    let all = app.get_json(&format!("/api/v1/users/{user}/measurements")).await;
    assert_eq!(all.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_without_date_uses_today() {
    let app = TestApp::new();
    let user = app.create_user(json!({ "name": "Boris" })).await;

    let (status, body) = app
        .put(&format!("/api/v1/users/{user}/measurements"), &json!({ "chest": 101.5 }).to_string())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body)["date"], TODAY);

    let entry = app
        .get_json(&format!("/api/v1/users/{user}/measurements/{TODAY}"))
        .await;
    assert_eq!(entry["chest"], 101.5);
}

#[tokio::test]
async fn test_rejections_are_structured() {
    let app = TestApp::new();
    let user = app.create_user(json!({ "name": "Clara" })).await;

    let (status, body) = app
        .put(
            &format!("/api/v1/users/{user}/measurements/2024-05-07"),
            &json!({ "weight": 70 }).to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(&body);
    assert_eq!(body["error"]["code"], "MEASUREMENT_REJECTED");
    assert_eq!(
        body["error"]["message"],
        "Cannot edit or add measurements for past dates"
    );

    let (status, body) = app
        .put(
            &format!("/api/v1/users/{user}/measurements/{TODAY}"),
            &json!({ "weight": "abc", "comment": "   " }).to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json(&body)["error"]["message"],
        "Enter at least one measurement or a comment"
    );

    let (status, _) = app
        .put(
            &format!("/api/v1/users/{user}/measurements/08.05.2024"),
            &json!({ "weight": 70 }).to_string(),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let all = app.get_json(&format!("/api/v1/users/{user}/measurements")).await;
    assert_eq!(all, json!({}));
}
