// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! HTTP server and handlers.
//!
//! - `GET /` and `GET /hello` - greeting messages
//! - `GET /data` - the whole dataset as a JSON array
//! - `GET /output-image?filename=<name>` - an artifact, name as query parameter
//! - `GET /output/:name` - an artifact, name as path segment

use std::io::ErrorKind;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::signal::unix::{SignalKind, signal};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::dataset::DataService;
use crate::errors::{BindError, GatewayError};
use crate::gateway::ArtifactGateway;

/// Application state shared across handlers.
#[derive(Debug)]
pub struct AppState {
    pub data: DataService,
    pub artifacts: ArtifactGateway,
}

/// Build the router with the cross-origin policy for `cors_origin`.
pub fn router(state: Arc<AppState>, cors_origin: HeaderValue) -> Router {
    // `*` cannot appear in an origin list.
    let allow_origin = if cors_origin == "*" {
        AllowOrigin::any()
    } else {
        AllowOrigin::list([cors_origin])
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/hello", get(hello_handler))
        .route("/data", get(data_handler))
        .route("/output-image", get(output_image_handler))
        .route("/output/:name", get(output_file_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server and serve until SIGINT or SIGTERM.
pub async fn run_server(data: DataService, config: ServerConfig) -> anyhow::Result<()> {
    if !config.output_dir.is_dir() {
        warn!(
            output_dir = %config.output_dir.display(),
            "artifact directory does not exist yet; artifact requests will return 404"
        );
    }

    let state = Arc::new(AppState {
        data,
        artifacts: ArtifactGateway::new(&config.output_dir),
    });
    let app = router(state, config.cors_origin.clone());

    let listener = bind_with_fallback(&config.host, config.port).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "exoplanet-server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("exoplanet-server stopped");
    Ok(())
}

/// Bind `host:port`, retrying once on `port + 1` if the port is taken.
pub async fn bind_with_fallback(host: &str, port: u16) -> Result<TcpListener, BindError> {
    let err = match TcpListener::bind((host, port)).await {
        Ok(listener) => return Ok(listener),
        Err(err) => err,
    };

    if err.kind() != ErrorKind::AddrInUse {
        return Err(BindError::Io {
            host: host.to_string(),
            port,
            source: err,
        });
    }

    let Some(fallback) = port.checked_add(1) else {
        return Err(BindError::PortInUse {
            host: host.to_string(),
            port,
        });
    };

    warn!(port, fallback, "port already in use, trying the next one");

    match TcpListener::bind((host, fallback)).await {
        Ok(listener) => Ok(listener),
        Err(err) if err.kind() == ErrorKind::AddrInUse => Err(BindError::PortInUse {
            host: host.to_string(),
            port,
        }),
        Err(source) => Err(BindError::Io {
            host: host.to_string(),
            port: fallback,
            source,
        }),
    }
}

async fn shutdown_signal() {
    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            warn!("failed to install SIGTERM handler: {e}");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for SIGINT: {e}");
            }
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("received SIGINT, shutting down"),
            Err(e) => error!("failed to listen for SIGINT: {e}"),
        },
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn index_handler() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Welcome" })
}

async fn hello_handler() -> Json<MessageResponse> {
    Json(MessageResponse { message: "Hello" })
}

/// GET /data - the dataset exactly as loaded at startup.
async fn data_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.data.json(),
    )
        .into_response()
}

#[derive(Deserialize)]
struct OutputImageQuery {
    #[serde(default)]
    filename: Option<String>,
}

/// GET /output-image?filename=<name>
async fn output_image_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OutputImageQuery>,
) -> Response {
    serve_artifact(&state, query.filename.as_deref().unwrap_or_default()).await
}

/// GET /output/:name
async fn output_file_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    serve_artifact(&state, &name).await
}

async fn serve_artifact(state: &AppState, name: &str) -> Response {
    match state.artifacts.serve(name).await {
        Ok(artifact) => (
            [(header::CONTENT_TYPE, artifact.content_type)],
            artifact.bytes,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingName | GatewayError::UnsafeName(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            GatewayError::UnsafeName(name) => warn!(name = %name, "rejected artifact request"),
            GatewayError::Io { .. } => error!(error = %self, "failed to read artifact"),
            _ => {}
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
