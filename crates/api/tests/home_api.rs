//! Integration tests for `GET /home`.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{body_json, build_test_app, get, send};
use wealthlist_db::models::millionaire::MillionaireInput;
use wealthlist_db::MillionaireStore;

async fn seed_worth(app: &common::TestApp, last_name: &str, net_worth: Option<f64>) -> i64 {
    app.store
        .create(&MillionaireInput {
            last_name: last_name.to_string(),
            first_name: "X".to_string(),
            net_worth,
            ..Default::default()
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn top_is_ranked_by_net_worth_with_unknown_last() {
    let app = build_test_app();
    let unknown = seed_worth(&app, "Unknown", None).await;
    let small = seed_worth(&app, "Small", Some(1.0e9)).await;
    let big = seed_worth(&app, "Big", Some(2.0e11)).await;
    let tie = seed_worth(&app, "Tie", Some(1.0e9)).await;

    let response = get(&app.router, "/home").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<i64> = json["topMillionaires"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![big, small, tie, unknown]);
}

#[tokio::test]
async fn top_is_limited_to_ten() {
    let app = build_test_app();
    for i in 0..15 {
        seed_worth(&app, &format!("M{i}"), Some(i as f64)).await;
    }
    let json = body_json(get(&app.router, "/home").await).await;
    assert_eq!(json["topMillionaires"].as_array().unwrap().len(), 10);
    assert_eq!(json["topMillionaires"][0]["netWorth"], 14.0);
}

#[tokio::test]
async fn photo_url_is_absolute_from_request_host() {
    let app = build_test_app();
    let id = seed_worth(&app, "Pictured", Some(5.0)).await;
    seed_worth(&app, "Plain", Some(1.0)).await;
    app.store
        .set_photo_path(id, Some("uploads/photos/1_face.jpg"))
        .await
        .unwrap();

    let request = Request::builder()
        .uri("/home")
        .header("host", "rich.example")
        .header("x-forwarded-proto", "https")
        .body(Body::empty())
        .unwrap();
    let json = body_json(send(&app.router, request).await).await;

    let top = &json["topMillionaires"];
    assert_eq!(top[0]["photoUrl"], "https://rich.example/photo/1_face.jpg");
    assert_eq!(top[0]["lastName"], "Pictured");
    assert_eq!(top[1]["photoUrl"], serde_json::Value::Null);
}

#[tokio::test]
async fn empty_catalogue_gives_empty_list() {
    let app = build_test_app();
    let json = body_json(get(&app.router, "/home").await).await;
    assert_eq!(json["topMillionaires"], serde_json::json!([]));
}

#[tokio::test]
async fn storage_failure_is_500() {
    let app = build_test_app();
    app.store.fail();
    assert_eq!(
        get(&app.router, "/home").await.status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}
