//! End-to-end tests: serve the app on an ephemeral port over in-process
//! tables and drive it with a real HTTP client.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use rebound_api::api;
use rebound_api::app_state::AppState;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn spawn_server() -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("ephemeral port should bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("bound listener should have an address");
    };
    let app = api::app(AppState::in_memory(), Duration::from_secs(5));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            panic!("server failed: {e}");
        }
    });
    addr
}

async fn json_body(response: reqwest::Response) -> Value {
    let Ok(body) = response.json::<Value>().await else {
        panic!("response should be JSON");
    };
    body
}

#[tokio::test]
async fn workout_plan_search_and_nested_exercises() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}/api/v1");
    let client = reqwest::Client::new();

    let Ok(response) = client
        .post(format!("{base}/exercises"))
        .json(&json!({ "name": "Back Squat", "equipment_required": "barbell" }))
        .send()
        .await
    else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::CREATED);
    let exercise = json_body(response).await;

    for (name, description) in [
        ("Leg Day", Some("Squats and lunges")),
        ("Upper Body", Some("Push and pull")),
        ("Full Body Strength", None),
    ] {
        let Ok(response) = client
            .post(format!("{base}/workout-plans"))
            .json(&json!({ "name": name, "description": description, "is_public": true }))
            .send()
            .await
        else {
            panic!("request should be sent");
        };
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let Ok(response) = client
        .get(format!("{base}/workout-plans/search?query=squat"))
        .send()
        .await
    else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page.get("total"), Some(&json!(1)));
    let Some(plan) = page
        .get("data")
        .and_then(Value::as_array)
        .and_then(|data| data.first())
    else {
        panic!("search should return the matching plan");
    };
    assert_eq!(plan.get("name"), Some(&json!("Leg Day")));
    let Some(plan_id) = plan.get("id").and_then(Value::as_str) else {
        panic!("plan should have an id");
    };

    let Ok(response) = client
        .post(format!("{base}/workout-plans/{plan_id}/exercises"))
        .json(&json!({
            "exercise_id": exercise.get("id"),
            "day_of_week": "monday",
            "exercise_order": 1,
            "sets": 5,
            "reps_target": 5,
        }))
        .send()
        .await
    else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::CREATED);

    let Ok(response) = client
        .get(format!(
            "{base}/workout-plans/{plan_id}/exercises?day_of_week=monday"
        ))
        .send()
        .await
    else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page.get("total"), Some(&json!(1)));
    assert_eq!(page.get("size"), Some(&json!(10)));
}

#[tokio::test]
async fn filters_by_null_and_enum_values() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}/api/v1");
    let client = reqwest::Client::new();
    let user_id = uuid::Uuid::new_v4();

    for (status, plan) in [
        ("scheduled", None),
        ("completed", None),
        ("completed", Some(uuid::Uuid::new_v4())),
    ] {
        let Ok(response) = client
            .post(format!("{base}/workout-sessions"))
            .json(&json!({ "user_id": user_id, "status": status, "plan_id": plan }))
            .send()
            .await
        else {
            panic!("request should be sent");
        };
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let Ok(response) = client
        .get(format!("{base}/workout-sessions?status=completed&plan_id=null"))
        .send()
        .await
    else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let page = json_body(response).await;
    assert_eq!(page.get("total"), Some(&json!(1)));

    let Ok(response) = client
        .get(format!("{base}/workout-sessions?mood=great"))
        .send()
        .await
    else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(
        body.get("error").and_then(|e| e.get("code")),
        Some(&json!(1003))
    );
}

#[tokio::test]
async fn openapi_document_is_served() {
    let addr = spawn_server().await;
    let Ok(response) = reqwest::get(format!("http://{addr}/api-docs/openapi.json")).await else {
        panic!("request should be sent");
    };
    assert_eq!(response.status(), StatusCode::OK);
    let doc = json_body(response).await;
    assert!(
        doc.get("paths")
            .and_then(|paths| paths.get("/api/v1/food-items/search"))
            .is_some()
    );
}
