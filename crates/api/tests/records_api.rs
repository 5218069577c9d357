//! Integration tests for `/records` CRUD.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, build_test_app, delete, get, json_request, post_json, put_json, seed};
use serde_json::json;
use wealthlist_db::MillionaireStore;

fn musk() -> serde_json::Value {
    json!({
        "lastName": "Musk",
        "firstName": "Elon",
        "country": "USA",
        "birthDate": "1971-06-28",
        "netWorth": 2.5e11,
        "company": "Tesla"
    })
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_assigned_id() {
    let app = build_test_app();
    let response = post_json(&app.router, "/records", &musk()).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert!(json["id"].as_i64().unwrap() > 0);
    assert_eq!(json["lastName"], "Musk");
    assert_eq!(json["birthDate"], "1971-06-28");
    assert_eq!(json["middleName"], serde_json::Value::Null);
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = build_test_app();
    let created = body_json(post_json(&app.router, "/records", &musk()).await).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(&app.router, &format!("/records/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn blank_optional_fields_are_stored_as_null() {
    let app = build_test_app();
    let body = json!({ "lastName": " Ortega ", "firstName": "Amancio", "industry": "   " });
    let json = body_json(post_json(&app.router, "/records", &body).await).await;
    assert_eq!(json["lastName"], "Ortega");
    assert_eq!(json["industry"], serde_json::Value::Null);
}

#[tokio::test]
async fn create_without_required_names_is_rejected() {
    let app = build_test_app();
    let response = post_json(&app.router, "/records", &json!({ "lastName": "Solo" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(app.store.rows().is_empty());
}

#[tokio::test]
async fn create_with_blank_name_is_a_validation_error() {
    let app = build_test_app();
    let body = json!({ "lastName": "   ", "firstName": "Elon" });
    let response = post_json(&app.router, "/records", &body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["details"].as_array().unwrap()[0]
        .as_str()
        .unwrap()
        .starts_with("last_name"));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = build_test_app();
    let response =
        json_request(&app.router, Method::POST, "/records", "{\"lastName\":".to_string()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let app = build_test_app();
    let response = get(&app.router, "/records/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Millionaire with id 999 not found"
    );
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let app = build_test_app();
    let response = get(&app.router, "/records/abc").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_replaces_fields_and_advances_updated_at() {
    let app = build_test_app();
    let created = seed(&app.store, "Musk", "Elon", Some("USA")).await;

    let body = json!({ "lastName": "Musk", "firstName": "Elon", "country": "Canada", "netWorth": 1.0 });
    let response = put_json(&app.router, &format!("/records/{}", created.id), &body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["country"], "Canada");
    assert_eq!(json["netWorth"], 1.0);

    let stored = app.store.get(created.id).unwrap();
    assert!(stored.updated_at >= created.updated_at);
    assert_eq!(stored.created_at, created.created_at);
}

#[tokio::test]
async fn update_keeps_the_photo_path() {
    let app = build_test_app();
    let created = seed(&app.store, "Musk", "Elon", None).await;
    app.store
        .set_photo_path(created.id, Some("uploads/photos/1_a.jpg"))
        .await
        .unwrap();

    let body = json!({ "lastName": "Musk", "firstName": "Elon", "pathToPhoto": null });
    let response = put_json(&app.router, &format!("/records/{}", created.id), &body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["pathToPhoto"],
        "uploads/photos/1_a.jpg"
    );
}

#[tokio::test]
async fn update_unknown_id_is_404() {
    let app = build_test_app();
    let body = json!({ "lastName": "A", "firstName": "B" });
    let response = put_json(&app.router, "/records/41", &body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_then_get_is_404() {
    let app = build_test_app();
    let created = seed(&app.store, "Arnault", "Bernard", Some("France")).await;
    let uri = format!("/records/{}", created.id);

    let response = delete(&app.router, &uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"].is_string());

    assert_eq!(get(&app.router, &uri).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_is_404() {
    let app = build_test_app();
    assert_eq!(
        delete(&app.router, "/records/5").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn delete_leaves_the_photo_file() {
    let app = build_test_app();
    let created = seed(&app.store, "Musk", "Elon", None).await;
    app.storage.insert("1_a.jpg", b"jpeg");
    app.store
        .set_photo_path(created.id, Some("uploads/photos/1_a.jpg"))
        .await
        .unwrap();

    let response = delete(&app.router, &format!("/records/{}", created.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.storage.file("1_a.jpg").as_deref(), Some(&b"jpeg"[..]));
    assert_eq!(app.storage.remove_calls(), 0);
}

// ---------------------------------------------------------------------------
// Storage failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn storage_failure_is_a_sanitized_500() {
    let app = build_test_app();
    app.store.fail();

    let response = post_json(&app.router, "/records", &musk()).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
