use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;
use common::mock_app::MockApp;

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().uri(uri).method(method);

    match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_get_rooms() {
    let app = MockApp::new();

    let response = app.router.clone().oneshot(request(Method::GET, "/rooms", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let rooms = json_body(response).await;
    assert_eq!(rooms.as_array().map(Vec::len), Some(2));
    assert_eq!(rooms[0]["id"], json!("lab"));
    assert_eq!(rooms[0]["status"], json!("EMPTY"));
    assert_eq!(rooms[1]["devices"][0]["type"], json!("LIGHT"));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/rooms/office", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["occupancy_count"], json!(3));
}

#[tokio::test]
async fn test_unknown_room_returns_not_found() {
    let app = MockApp::new();

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/rooms/attic", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], json!(404));
    assert_eq!(body["error"]["message"], json!("Room not found: attic"));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::POST, "/rooms/attic/analyze", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_analyze_room() {
    let app = MockApp::new();

    let response = app
        .router
        .clone()
        .oneshot(request(Method::POST, "/rooms/lab/analyze", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["outcome"], json!("completed"));
    assert_eq!(body["source"], json!("remote"));
    assert_eq!(body["result"]["personCount"], json!(3));
    assert_eq!(body["room"]["status"], json!("OCCUPIED"));
}

#[tokio::test]
async fn test_status_and_camera_binding() {
    let app = MockApp::new();

    let response = app.router.clone().oneshot(request(Method::GET, "/status", None)).await.unwrap();
    let status = json_body(response).await;
    assert_eq!(status["rate_limit"], json!({ "throttled": false, "cooldown_seconds": 0 }));
    assert_eq!(status["grid_load_watts"], json!(1100));
    assert_eq!(status["grid_load_high"], json!(false));
    assert_eq!(status["savings"]["total_saved_kwh"], json!(142.5));
    assert_eq!(status["auto_cycle"], json!(false));
    assert_eq!(status["camera_room"], json!("lab"));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/control/camera", Some(json!({ "room_id": "office" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["camera_room"], json!("office"));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/control/camera", Some(json!({ "room_id": null }))))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["camera_room"], Value::Null);

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/control/camera", Some(json!({ "room_id": "attic" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_auto_cycle() {
    let app = MockApp::new();

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/control/auto-cycle", Some(json!({ "enabled": true }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["auto_cycle"], json!(true));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/control/auto-cycle", Some(json!({ "enabled": false }))))
        .await
        .unwrap();
    assert_eq!(json_body(response).await["auto_cycle"], json!(false));
    assert!(!app.context.auto_cycle_service.is_enabled());
}

#[tokio::test]
async fn test_activity_and_telemetry_after_start() {
    let app = MockApp::new();
    app.context.start().await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let response = app.router.clone().oneshot(request(Method::GET, "/activity", None)).await.unwrap();
    let entries = json_body(response).await;
    assert_eq!(entries[0]["room"], json!("System"));
    assert_eq!(entries[0]["message"], json!("EcoSense Grid Node Connected"));
    assert_eq!(entries[0]["severity"], json!("SUCCESS"));

    let response = app.router.clone().oneshot(request(Method::GET, "/telemetry", None)).await.unwrap();
    let samples = json_body(response).await;
    assert_eq!(samples.as_array().map(Vec::len), Some(1));
    assert_eq!(samples[0]["consumption"], json!(1.1));
    assert_eq!(samples[0]["savings"], json!(1.78));

    app.context.shutdown();
}

#[tokio::test]
async fn test_theme_preference() {
    let app = MockApp::new();

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/preferences/theme", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!({ "theme": "light" }));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/preferences/theme", Some(json!({ "theme": "dark" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .clone()
        .oneshot(request(Method::GET, "/preferences/theme", None))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!({ "theme": "dark" }));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::PUT, "/preferences/theme", Some(json!({ "theme": "sepia" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_camera_uplink() {
    let app = MockApp::new();

    let response = app
        .router
        .clone()
        .oneshot(request(Method::POST, "/camera/frame", Some(json!({ "frame": "%%%" }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], json!(400));
    assert!(
        body["error"]["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Frame is not valid base64"))
    );

    let response = app
        .router
        .clone()
        .oneshot(request(Method::POST, "/camera/frame", Some(json!({ "frame": "  " }))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["message"], json!("Frame is empty"));

    let response = app
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/camera/frame",
            Some(json!({ "frame": "data:image/jpeg;base64,aGVsbG8=" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["active"], json!(true));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::POST, "/camera/error", Some(json!({ "name": "NotAllowedError" }))))
        .await
        .unwrap();
    let status = json_body(response).await;
    assert_eq!(status["active"], json!(false));
    assert_eq!(status["error"]["kind"], json!("PERMISSION_DENIED"));
    assert_eq!(status["error"]["title"], json!("Access Restricted"));

    let response = app
        .router
        .clone()
        .oneshot(request(Method::DELETE, "/camera/frame", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.router.clone().oneshot(request(Method::GET, "/camera", None)).await.unwrap();
    assert_eq!(json_body(response).await["active"], json!(false));
}
