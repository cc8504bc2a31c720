//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, CORS)
//! - Bind server to listener
//! - Apply live configuration updates
//! - Stop on the shutdown signal

use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::directory::DirectoryService;
use crate::http::handlers::{add_employee, health, search_employees};
use crate::http::request::request_span;
use crate::lifecycle::ShutdownSignal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: DirectoryService,
}

/// HTTP server for the directory.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    service: DirectoryService,
}

impl HttpServer {
    /// Create a new HTTP server around an assembled service.
    pub fn new(config: ServiceConfig, service: DirectoryService) -> Self {
        let state = AppState {
            service: service.clone(),
        };
        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            service,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/search", post(search_employees))
            .route("/employees", post(add_employee))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            // Any origin, method and header; browsers call the API directly.
            .layer(CorsLayer::permissive())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    ///
    /// Configurations received on `config_updates` replace the rate limit
    /// ceiling while the server runs.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            requests_per_window = self.config.rate_limit.requests_per_window,
            "HTTP server starting"
        );

        let limiter = self.service.limiter().clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                limiter.set_ceiling(config.rate_limit.requests_per_window);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::SearchEngine;
    use crate::security::RateLimiter;
    use crate::storage::Database;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn router(ceiling: u32) -> Router {
        let db = Database::in_memory().unwrap();
        db.init_schema().unwrap();
        let service = DirectoryService::new(Arc::new(RateLimiter::new(ceiling)), SearchEngine::new(db));
        HttpServer::build_router(&ServiceConfig::default(), AppState { service })
    }

    fn post(uri: &str, org: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(org) = org {
            builder = builder.header("X-Org-Id", org);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        assert!(response.headers().contains_key("x-request-id"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn john() -> Value {
        json!({
            "firstname": "John",
            "lastname": "Doe",
            "contact": "1234567890",
            "department": "HR",
            "position": "Manager",
            "location": "NY",
            "status": "Active",
            "extra": {"badge": "B-1"}
        })
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(10);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_add_then_search() {
        let app = router(10);
        let (status, body) = send(&app, post("/employees", Some("org_a"), john())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_i64());

        let (status, body) = send(
            &app,
            post(
                "/search?page=1&page_size=10&sort_by=lastname&sort_order=desc",
                Some("org_a"),
                json!({"firstname": "John", "columns": ["lastname", "badge"]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"results": [{"lastname": "Doe", "badge": "B-1"}], "total": 1}));
    }

    #[tokio::test]
    async fn test_missing_org_header() {
        let app = router(10);
        let (status, body) = send(&app, post("/search", None, json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], json!("Missing organization header"));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let app = router(1);
        let (status, _) = send(&app, post("/search", Some("org_a"), json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&app, post("/search", Some("org_a"), json!({}))).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["detail"], json!("Rate limit exceeded"));
    }

    #[tokio::test]
    async fn test_invalid_record() {
        let app = router(10);
        let mut record = john();
        record["extra"] = json!({"org_id": "org_b"});
        let (status, _) = send(&app, post("/employees", Some("org_a"), record)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let app = router(10);
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/search")
            .header("origin", "http://localhost:3000")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "x-org-id,content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_headers_on_simple_request() {
        let app = router(10);
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_undecodable_body_uses_detail_shape() {
        let app = router(10);
        let (status, body) = send(
            &app,
            post("/search", Some("org_a"), json!({"status": "Retired"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("Retired"));

        let request = Request::builder()
            .method("POST")
            .uri("/employees")
            .header("content-type", "application/json")
            .header("X-Org-Id", "org_a")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_bad_query_string_uses_detail_shape() {
        let app = router(10);
        let (status, body) =
            send(&app, post("/search?page=first", Some("org_a"), json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_out_of_range_paging_is_accepted() {
        let app = router(10);
        let (status, body) = send(
            &app,
            post("/search?page=-4&page_size=1000&sort_by=salary", Some("org_a"), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(0));
    }
}
