//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Apply host routing before handler selection
//! - Serve sitemaps and health checks at the edge
//! - Forward everything else to the page renderer

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::Layer;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::EdgeConfig;
use crate::http::middleware::host_routing_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::OriginalPath;
use crate::http::upstream::{UpstreamClient, UpstreamError};
use crate::observability::metrics;
use crate::routing::{HostRouter, RouteRequest, Scheme};
use crate::sitemap::{SitemapFile, SitemapGenerator};

/// Application state injected into handlers and the routing middleware.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<HostRouter>,
    pub sitemaps: Arc<SitemapGenerator>,
    pub upstream: UpstreamClient,
    pub default_scheme: Scheme,
}

impl AppState {
    pub fn from_config(config: &EdgeConfig) -> Result<Self, UpstreamError> {
        let router = HostRouter::default();
        let sitemaps = SitemapGenerator::new(router.root_domain(), &config.locations);
        let upstream = UpstreamClient::new(
            &config.upstream.address,
            Duration::from_secs(config.timeouts.connect_secs),
        )?;

        Ok(Self {
            router: Arc::new(router),
            sitemaps: Arc::new(sitemaps),
            upstream,
            default_scheme: Scheme::parse(&config.upstream.default_scheme)
                .unwrap_or(Scheme::Https),
        })
    }
}

/// HTTP server for the site edge.
pub struct HttpServer {
    router: Router,
    config: EdgeConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: EdgeConfig) -> Result<Self, UpstreamError> {
        let state = AppState::from_config(&config)?;
        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Host routing wraps the inner router so that rewritten paths are
    /// matched against the edge routes.
    fn build_router(config: &EdgeConfig, state: AppState) -> Router {
        let edge_routes = Router::new()
            .route("/sitemap.xml", get(sitemap_handler))
            .route("/sitemap-pages.xml", get(sitemap_pages_handler))
            .route("/healthz", get(health_handler))
            .fallback(page_handler)
            .with_state(state.clone());

        let routed = from_fn_with_state(state, host_routing_middleware).layer(edge_routes);

        Router::new()
            .fallback_service(routed)
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            locations = self.config.locations.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn sitemap_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    render_sitemap(&state, &request, SitemapFile::Primary)
}

async fn sitemap_pages_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    render_sitemap(&state, &request, SitemapFile::MainPages)
}

fn render_sitemap(state: &AppState, request: &Request<Body>, file: SitemapFile) -> Response {
    let host = RouteRequest::from_http(request, state.default_scheme);
    let kind = state.router.classify(host.authority());

    match state.sitemaps.render(&kind, file) {
        Ok(Some(xml)) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            xml,
        )
            .into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(e) => {
            tracing::error!(request_id = %request.request_id(), error = %e, "Sitemap generation failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Forwards to the page renderer.
async fn page_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request.request_id().to_string();
    let path = request.uri().path().to_string();
    let original_path = request.extensions().get::<OriginalPath>().map(|p| p.0.clone());

    tracing::debug!(
        request_id = %request_id,
        path = %path,
        original_path = ?original_path,
        "Forwarding to renderer"
    );

    match state.upstream.forward(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Upstream error");
            metrics::record_upstream_error();
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocationConfig;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let mut config = EdgeConfig::default();
        // Nothing listens here; forwarded requests fail fast with 502.
        config.upstream.address = "127.0.0.1:1".into();
        config.locations.push(LocationConfig {
            id: "austin".into(),
            name: "Austin".into(),
            state: "tx".into(),
        });
        HttpServer::new(config).unwrap()
    }

    async fn get(host: &str, path: &str) -> Response {
        let request = Request::builder()
            .uri(path)
            .header("Host", host)
            .body(Body::empty())
            .unwrap();
        server().router().oneshot(request).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_bare_root_redirect() {
        let response = get("unitedplumbingcctx.com", "/about?x=1").await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://www.unitedplumbingcctx.com/about?x=1"
        );
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_blocked_service_detail() {
        let response = get("austin.unitedplumbingcctx.com", "/services/plumber-drain-cleaning").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "Not Found");
    }

    #[tokio::test]
    async fn test_health() {
        let response = get("www.unitedplumbingcctx.com", "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_sitemaps_by_host() {
        let response = get("www.unitedplumbingcctx.com", "/sitemap.xml").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml; charset=utf-8"
        );
        assert!(body_text(response).await.contains("https://austin.unitedplumbingcctx.com/sitemap.xml"));

        let response = get("austin.unitedplumbingcctx.com", "/sitemap.xml").await;
        assert!(body_text(response).await.contains("<urlset"));

        let response = get("dallas.unitedplumbingcctx.com", "/sitemap.xml").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get("austin.unitedplumbingcctx.com", "/sitemap-pages.xml").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unreachable_renderer_is_bad_gateway() {
        let response = get("austin.unitedplumbingcctx.com", "/").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_invalid_upstream_rejected() {
        let mut config = EdgeConfig::default();
        config.upstream.address = "bad address".into();
        assert!(HttpServer::new(config).is_err());
    }
}
