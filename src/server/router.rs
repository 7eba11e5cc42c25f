use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{Json, Router, routing::get};
use chrono::Utc;
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::auth::auth_router;
use super::completed::completed_router;
use super::ongoing::ongoing_router;
use super::upcoming::upcoming_router;
use crate::auth::SessionKeys;
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub sessions: SessionKeys,
    /// Production cookie attributes (`Secure; SameSite=None`).
    pub secure_cookies: bool,
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found" })),
    )
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid allowed origin: {origin}");
                None
            }
        })
        .collect();

    // Credentialed CORS requires an explicit origin list; requests without an
    // Origin header (curl, server-to-server) are not subject to CORS at all.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .route("/api/health", get(health))
        .nest("/api/auth", auth_router())
        .nest("/api/upcoming", upcoming_router())
        .nest("/api/ongoing", ongoing_router())
        .nest("/api/completed", completed_router())
        .fallback(not_found)
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .with_state(state)
}
