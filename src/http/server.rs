//! HTTP host adapter.
//!
//! # Responsibilities
//! - Create the Axum router that funnels every path into the dispatcher
//! - Wire up middleware (tracing, timeout, request ID)
//! - Translate dispatch outcomes into HTTP status codes
//! - Serve until the shutdown signal fires
//!
//! # Design Decisions
//! - The container core stays transport-neutral; this adapter owns the only
//!   axum-facing code
//! - Dispatch misses map to 404, handler faults to 500; faults never take
//!   the server down

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{request_id::SetRequestIdLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ContainerConfig;
use crate::dispatch::{DispatchError, Dispatcher};
use crate::http::request::{HttpRequest, MakeRequestUuid, X_REQUEST_ID};
use crate::observability::metrics;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// HTTP server feeding inbound requests to the container's dispatcher.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &ContainerConfig, dispatcher: Dispatcher) -> Self {
        let state = AppState {
            dispatcher: Arc::new(dispatcher),
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ContainerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(SetRequestIdLayer::new(
                HeaderName::from_static(X_REQUEST_ID),
                MakeRequestUuid,
            ))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: every inbound path goes through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let path = request.uri().path().to_string();
    let inbound = HttpRequest::from_uri(request.uri());

    tracing::debug!(request_id = %request_id, path = %path, "dispatching inbound request");

    match state.dispatcher.dispatch(&inbound) {
        Ok(outcome) => {
            let status =
                StatusCode::from_u16(outcome.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            metrics::record_dispatch(&path, status.as_u16(), start);
            (status, outcome.into_body()).into_response()
        }
        Err(DispatchError::NotFound { .. }) => {
            tracing::warn!(request_id = %request_id, path = %path, "no handler for path");
            metrics::record_dispatch(&path, 404, start);
            (StatusCode::NOT_FOUND, "no handler for path").into_response()
        }
        Err(error @ DispatchError::Handler { .. }) => {
            tracing::error!(request_id = %request_id, path = %path, error = %error, "handler failed");
            metrics::record_dispatch(&path, 500, start);
            (StatusCode::INTERNAL_SERVER_ERROR, "handler invocation failed").into_response()
        }
    }
}
