use reqwest::StatusCode;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use taskdeck::api::{ApiClient, ApiError};
use taskdeck::task::{TaskInput, TaskStatus};

fn client_for(server: &MockServer) -> ApiClient {
    let base_url: Url = server.uri().parse().expect("mock server uri");
    ApiClient::new(base_url)
}

fn task_json(id: u64, title: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("description of {title}"),
        "status": status,
        "created_at": "2026-08-07T10:15:30.123456",
        "updated_at": "2026-08-07T10:15:30.123456"
    })
}

#[tokio::test]
async fn list_tasks_returns_the_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            task_json(1, "Buy milk", "pending"),
            task_json(2, "Ship release", "in-progress"),
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tasks = client.list_tasks().await.expect("list should succeed");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, 1);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].status, TaskStatus::Pending);
    assert_eq!(tasks[1].status, TaskStatus::InProgress);
}

#[tokio::test]
async fn list_tasks_handles_an_empty_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let tasks = client.list_tasks().await.expect("list should succeed");
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn get_task_hits_the_id_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(7, "Buy milk", "pending")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let task = client.get_task(7).await.expect("get should succeed");
    assert_eq!(task.id, 7);
    assert_eq!(task.title, "Buy milk");
}

#[tokio::test]
async fn create_task_posts_exactly_the_three_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": "2%",
            "status": "pending"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_json(1, "Buy milk", "pending")))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = TaskInput {
        title: "Buy milk".into(),
        description: "2%".into(),
        status: TaskStatus::Pending,
    };
    let created = client.create_task(&input).await.expect("create should succeed");

    // The id comes from the server, never from the client.
    assert_eq!(created.id, 1);
    assert_eq!(created.title, "Buy milk");
}

#[tokio::test]
async fn update_task_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/3"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": "2%",
            "status": "completed"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(task_json(3, "Buy milk", "completed")),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let input = TaskInput {
        title: "Buy milk".into(),
        description: "2%".into(),
        status: TaskStatus::Completed,
    };

    let first = client.update_task(3, &input).await.expect("first update");
    let second = client.update_task(3, &input).await.expect("second update");
    assert_eq!(first.id, second.id);
    assert_eq!(first.status, second.status);
    assert_eq!(first.title, second.title);
}

#[tokio::test]
async fn delete_task_ignores_the_response_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Task deleted successfully",
            "deleted_task": task_json(3, "Buy milk", "pending")
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.delete_task(3).await.expect("delete should succeed");
}

#[tokio::test]
async fn any_non_2xx_status_is_an_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.list_tasks().await.expect_err("500 should fail");
    assert!(
        matches!(err, ApiError::Http { status } if status == StatusCode::INTERNAL_SERVER_ERROR),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn not_found_maps_to_the_same_failure_kind() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Task not found"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.get_task(99).await.expect_err("404 should fail");
    assert!(matches!(err, ApiError::Http { status } if status == StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_failure() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
        // Dropping the server closes its listener.
    };

    let client = ApiClient::new(uri.parse().expect("uri"));
    let err = client.list_tasks().await.expect_err("connect should fail");
    assert!(matches!(err, ApiError::Transport(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn stats_parses_the_aggregate_counts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tasks": 4,
            "pending_tasks": 1,
            "in_progress_tasks": 1,
            "completed_tasks": 2,
            "completion_rate": 50.0
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let stats = client.stats().await.expect("stats should succeed");
    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.completed_tasks, 2);
    assert!((stats.completion_rate - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn health_check_reports_the_status_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Task Manager API is running!"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.health_check().await.expect("health check"));
}

#[tokio::test]
async fn health_check_is_false_on_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.health_check().await.expect("health check"));
}
