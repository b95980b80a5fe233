//! End-to-end tests for the habit API.
//!
//! Each test builds a fresh router around its own store and drives it with
//! `tower::ServiceExt::oneshot`, so no listener or network is involved.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use habit_tracker::api::{create_router, AppState};
use habit_tracker::config::Config;
use habit_tracker::habits::HabitStore;
use habit_tracker::utils::today_utc;

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::with_store(Arc::new(HabitStore::new()), &Config::default());
        Self {
            router: create_router(state),
        }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    async fn create(&self, name: &str) -> String {
        let (status, body) = self
            .post(
                "/api/habits",
                json!({
                    "name": name,
                    "description": format!("{name} every day"),
                    "target_days_per_week": 5,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn log(&self, id: &str, date: &str) -> (StatusCode, Value) {
        self.post(&format!("/api/habits/{id}/log"), json!({ "date": date }))
            .await
    }
}

fn names(body: &Value) -> Vec<String> {
    body["habits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_habit_returns_record_and_message() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/habits",
            json!({
                "name": "Exercise",
                "description": "Do 30 minutes of exercise",
                "target_days_per_week": 5,
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
    assert_eq!(body["name"], "Exercise");
    assert_eq!(body["description"], "Do 30 minutes of exercise");
    assert_eq!(body["target_days_per_week"], 5);
    assert_eq!(body["message"], "Habit created successfully.");
}

#[tokio::test]
async fn create_habit_missing_fields_is_400() {
    let app = TestApp::new();
    let bodies = [
        json!({ "description": "d", "target_days_per_week": 5 }),
        json!({ "name": "n", "target_days_per_week": 5 }),
        json!({ "name": "n", "description": "d" }),
        json!({ "name": "", "description": "d", "target_days_per_week": 5 }),
        json!({ "name": "n", "description": "d", "target_days_per_week": 0 }),
        json!({ "name": "n", "description": "d", "target_days_per_week": "five" }),
    ];

    for body in bodies {
        let (status, response) = app.post("/api/habits", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing required fields");
    }

    let (_, list) = app.get("/api/habits").await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn create_habit_with_malformed_json_is_400() {
    let app = TestApp::new();
    let request = Request::builder()
        .method("POST")
        .uri("/api/habits")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
}

#[tokio::test]
async fn log_completion_then_duplicate_conflicts() {
    let app = TestApp::new();
    let id = app.create("Exercise").await;

    let (status, body) = app.log(&id, "2024-01-01").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": id,
            "date": "2024-01-01",
            "message": "Completion logged successfully.",
        })
    );

    let (status, body) = app.log(&id, "2024-01-01").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Completion already logged for this date");
}

#[tokio::test]
async fn log_completion_for_unknown_habit_is_404() {
    let app = TestApp::new();

    let (status, body) = app.log(&Uuid::new_v4().to_string(), "2024-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Habit not found");
}

#[tokio::test]
async fn log_completion_without_date_is_400() {
    let app = TestApp::new();
    let id = app.create("Exercise").await;

    let (status, body) = app.post(&format!("/api/habits/{id}/log"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input data.");
}

#[tokio::test]
async fn delete_then_log_is_404() {
    let app = TestApp::new();
    let id = app.create("Exercise").await;
    app.log(&id, "2024-01-01").await;

    let (status, body) = app.delete(&format!("/api/habits/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.log(&id, "2024-01-02").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/api/habits/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_by_name() {
    let app = TestApp::new();
    app.create("Exercise").await;
    app.create("Reading").await;

    let (status, body) = app.get("/api/habits?name=exer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Exercise"]);
    assert_eq!(body["total"], 1);
}

#[tokio::test]
async fn list_filters_by_todays_status() {
    let app = TestApp::new();
    let a = app.create("A").await;
    app.create("B").await;
    let today = today_utc().unwrap();
    let (status, _) = app.log(&a, &today).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, completed) = app.get("/api/habits?status=completed").await;
    assert_eq!(names(&completed), vec!["A"]);

    let (_, not_completed) = app.get("/api/habits?status=not_completed").await;
    assert_eq!(names(&not_completed), vec!["B"]);

    let (_, unknown) = app.get("/api/habits?status=whenever").await;
    assert_eq!(names(&unknown), vec!["A", "B"]);
}

#[tokio::test]
async fn list_paginates() {
    let app = TestApp::new();
    for i in 0..15 {
        app.create(&format!("Habit {i}")).await;
    }

    let (status, body) = app.get("/api/habits?page=2&limit=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["habits"].as_array().unwrap().len(), 5);
    assert_eq!(body["total"], 15);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 10);

    let (_, body) = app.get("/api/habits?page=5&limit=10").await;
    assert!(body["habits"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 15);

    let (_, body) = app.get("/api/habits?page=x&limit=y").await;
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["habits"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn list_reports_completed_days() {
    let app = TestApp::new();
    let id = app.create("Exercise").await;
    app.create("Reading").await;
    for date in ["2024-01-01", "2024-01-02", "2024-01-01"] {
        app.log(&id, date).await;
    }

    let (_, body) = app.get("/api/habits").await;
    let habits = body["habits"].as_array().unwrap();
    assert_eq!(habits[0]["name"], "Exercise");
    assert_eq!(habits[0]["completed_days"], 2);
    assert_eq!(habits[1]["completed_days"], 0);
}

#[tokio::test]
async fn list_limit_above_one_hundred_is_not_capped() {
    let app = TestApp::new();
    for i in 0..150 {
        app.create(&format!("Habit {i}")).await;
    }

    let (status, body) = app.get("/api/habits?limit=200").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["habits"].as_array().unwrap().len(), 150);
    assert_eq!(body["total"], 150);
    assert_eq!(body["limit"], 200);
}

#[tokio::test]
async fn list_with_repeated_keys_keeps_filters() {
    let app = TestApp::new();
    let exercise = app.create("Exercise").await;
    app.create("Reading").await;
    let today = today_utc().unwrap();
    app.log(&exercise, &today).await;

    let (status, body) = app.get("/api/habits?name=exer&page=1&page=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Exercise"]);
    assert_eq!(body["total"], 1);

    let (_, body) = app
        .get("/api/habits?status=completed&limit=1&limit=5")
        .await;
    assert_eq!(names(&body), vec!["Exercise"]);
    assert_eq!(body["limit"], 1);
}
