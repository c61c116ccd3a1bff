// SPDX-License-Identifier: MIT

//! API input validation tests (offline; validation runs before the store).

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn json_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, common::mock_token("alice"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn register_rejects_invalid_email() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_post(
            "/api/users/register",
            r#"{"name": "Ana", "email": "not-an-email"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_empty_name() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_post(
            "/api/users/register",
            r#"{"name": "", "email": "ana@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn fcm_token_rejects_empty_token() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(json_post("/api/users/fcm-token", r#"{"token": ""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn schedule_rejects_malformed_times() {
    for body in [
        r#"{"lunch_time": "24:00"}"#,
        r#"{"dinner_time": "19:60"}"#,
        r#"{"lunch_time": "7:00"}"#,
        r#"{"dinner_time": "noonish"}"#,
    ] {
        let (app, _) = common::create_test_app();

        let request = Request::builder()
            .method("PUT")
            .uri("/api/schedule")
            .header(header::AUTHORIZATION, common::mock_token("alice"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
    }
}
