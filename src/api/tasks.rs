//! Task CRUD endpoints.
//!
//! - `GET /api/tasks` - List all tasks
//! - `POST /api/tasks` - Create a task
//! - `GET /api/tasks/:id` - Get one task
//! - `PUT /api/tasks/:id` - Full update, or status-only update when the body carries just `status`
//! - `DELETE /api/tasks/:id` - Delete a task

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::routes::AppState;
use super::types::{ApiError, Envelope};
use crate::task::{parse_task_id, Task, TaskPayload};

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
}

fn read_body(body: Result<Json<TaskPayload>, JsonRejection>) -> Result<TaskPayload, ApiError> {
    body.map(|Json(payload)| payload)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

/// GET /api/tasks - List all tasks in storage order.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Vec<Task>>>, ApiError> {
    let tasks = state.tasks.list().await?;
    tracing::debug!("Listed {} tasks", tasks.len());
    Ok(Json(Envelope::data(tasks)))
}

/// GET /api/tasks/:id - Get one task.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    let task = state.tasks.get(&id).await?;
    Ok(Json(Envelope::data(task)))
}

/// POST /api/tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    body: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Task>>), ApiError> {
    let payload = read_body(body)?;
    let task = state.tasks.create(&payload).await?;
    tracing::info!("Created task {} ({})", task.id, task.title);
    Ok((StatusCode::CREATED, Json(Envelope::data(task))))
}

/// PUT /api/tasks/:id - Update a task.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<Envelope<Task>>, ApiError> {
    // The id is judged before the body.
    parse_task_id(&id)?;
    let payload = read_body(body)?;
    let task = state.tasks.update(&id, &payload).await?;
    tracing::info!("Updated task {} (status: {})", task.id, task.status);
    Ok(Json(Envelope::data(task)))
}

/// DELETE /api/tasks/:id - Delete a task.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let task = state.tasks.delete(&id).await?;
    tracing::info!("Deleted task {}", task.id);
    Ok(Json(Envelope::message("Task deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::super::routes::{app, AppState};
    use crate::config::Config;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(Arc::new(AppState::new(Config::new("memory://"))))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(raw) => {
                request = request.header("content-type", "application/json");
                Body::from(raw.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_end_to_end_task_lifecycle() {
        let app = test_app();

        let (status, created) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(r#"{"title":"Buy milk","description":"2%","dueDate":"2025-01-10","status":"pending"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["success"], true);
        let id = created["data"]["_id"].as_str().expect("generated id").to_string();
        assert_eq!(id.len(), 24);

        let (status, fetched) = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["title"], "Buy milk");
        assert_eq!(fetched["data"]["description"], "2%");
        assert_eq!(fetched["data"]["status"], "pending");
        assert_eq!(fetched["data"]["dueDate"], "2025-01-10T00:00:00.000Z");

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(r#"{"status":"completed"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["status"], "completed");

        let (_, fetched) = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;
        assert_eq!(fetched["data"]["status"], "completed");
        assert_eq!(fetched["data"]["title"], "Buy milk");
        assert_eq!(fetched["data"]["description"], "2%");
        assert_eq!(fetched["data"]["dueDate"], "2025-01-10T00:00:00.000Z");

        let (status, deleted) = send(&app, "DELETE", &format!("/api/tasks/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            deleted,
            json!({"success": true, "message": "Task deleted successfully"})
        );

        let (status, missing) = send(&app, "GET", &format!("/api/tasks/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing, json!({"success": false, "error": "Task not found"}));
    }

    #[tokio::test]
    async fn test_create_defaults_status() {
        let app = test_app();
        let (status, created) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(r#"{"title":"Call mom","description":"Sunday","dueDate":"2025-03-01"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["status"], "pending");
        assert!(created["data"]["createdAt"].is_string());
        assert_eq!(created["data"]["createdAt"], created["data"]["updatedAt"]);
    }

    #[tokio::test]
    async fn test_create_missing_fields_is_rejected_and_not_stored() {
        let app = test_app();
        let (status, body) = send(&app, "POST", "/api/tasks", Some(r#"{"title":"Only a title"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": "Description is required, Due date is required"})
        );

        let (_, listed) = send(&app, "GET", "/api/tasks", None).await;
        assert_eq!(listed, json!({"success": true, "data": []}));
    }

    #[tokio::test]
    async fn test_invalid_status_is_rejected() {
        let app = test_app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(r#"{"title":"t","description":"d","dueDate":"2025-03-01","status":"done"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "'done' is not a valid status");
    }

    #[tokio::test]
    async fn test_malformed_ids_are_bad_requests() {
        let app = test_app();
        for (method, body) in [
            ("GET", None),
            ("PUT", Some(r#"{"status":"completed"}"#)),
            ("DELETE", None),
        ] {
            let (status, json) = send(&app, method, "/api/tasks/not-an-id", body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
            assert_eq!(json["error"], "Invalid task ID format", "{method}");
        }
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let app = test_app();
        let uri = "/api/tasks/65a1f0c2e4b0a1b2c3d4e5f6";
        for (method, body) in [
            ("GET", None),
            ("PUT", Some(r#"{"status":"completed"}"#)),
            ("DELETE", None),
        ] {
            let (status, json) = send(&app, method, uri, body).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
            assert_eq!(json["success"], false);
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_bad_request() {
        let app = test_app();
        let (status, body) = send(&app, "POST", "/api/tasks", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON body:"));
    }

    #[tokio::test]
    async fn test_update_checks_id_before_body() {
        let app = test_app();
        let (status, body) = send(&app, "PUT", "/api/tasks/xyz", Some("{broken")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid task ID format");
    }

    #[tokio::test]
    async fn test_full_update_replaces_fields() {
        let app = test_app();
        let (_, created) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(r#"{"title":"Draft","description":"v1","dueDate":"2025-01-01"}"#),
        )
        .await;
        let id = created["data"]["_id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(r#"{"title":"Final","description":"v2","dueDate":"2025-02-01T12:00:00Z","status":"in-progress"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["title"], "Final");
        assert_eq!(updated["data"]["description"], "v2");
        assert_eq!(updated["data"]["dueDate"], "2025-02-01T12:00:00.000Z");
        assert_eq!(updated["data"]["status"], "in-progress");
        assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

        let (status, rejected) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{id}"),
            Some(r#"{"title":"Only title"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            rejected["error"],
            "Description is required, Due date is required"
        );
    }

    #[tokio::test]
    async fn test_list_keeps_storage_order() {
        let app = test_app();
        for title in ["first", "second", "third"] {
            let body = format!(r#"{{"title":"{title}","description":"d","dueDate":"2025-01-01"}}"#);
            let (status, _) = send(&app, "POST", "/api/tasks", Some(&body)).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (status, listed) = send(&app, "GET", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::OK);
        let titles: Vec<&str> = listed["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_misconfigured_store_surfaces_as_500() {
        let app = app(Arc::new(AppState::new(Config::new("postgres://nope"))));
        let (status, body) = send(&app, "GET", "/api/tasks", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Unsupported DATABASE_URL"));

        // Malformed ids are still rejected without needing the store.
        let (status, _) = send(&app, "GET", "/api/tasks/bad", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
