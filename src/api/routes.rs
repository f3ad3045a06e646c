//! HTTP server assembly.

use std::sync::Arc;

use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::store::StoreHandle;
use crate::task::{format_timestamp, TaskRepository};

use super::tasks as tasks_api;
use super::types::TestResponse;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Task operations over the lazily opened store
    pub tasks: TaskRepository,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(StoreHandle::new(config.database_url.clone()));
        Self {
            config,
            tasks: TaskRepository::new(store),
        }
    }
}

/// Build the router with all routes and layers.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/test", get(api_test))
        .nest("/api/tasks", tasks_api::routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// GET /api/test - Liveness check.
async fn api_test(State(state): State<Arc<AppState>>) -> Json<TestResponse> {
    Json(TestResponse {
        success: true,
        message: "API is working!".to_string(),
        timestamp: format_timestamp(&chrono::Utc::now()),
        environment: state.config.environment.clone(),
    })
}

/// Wait for SIGINT/SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}
