//! Host routing middleware.
//! Applies the routing decision before any handler is selected.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;

use crate::http::request::RequestIdExt;
use crate::http::response::{rewrite_uri, terminal_response, OriginalPath};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{RouteRequest, RoutingDecision};

pub async fn host_routing_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = metrics::method_label(request.method());

    let route_request = RouteRequest::from_http(&request, state.default_scheme);
    let decision = state.router.route(&route_request);
    metrics::record_decision(decision.kind());

    tracing::debug!(
        request_id = %request.request_id(),
        host = %route_request.authority(),
        path = %route_request.path(),
        decision = decision.kind(),
        "Routing decision"
    );

    let response = match terminal_response(&decision) {
        Some(response) => response,
        None => {
            if let RoutingDecision::Rewrite { target_path } = &decision {
                if let Err(response) = apply_rewrite(&mut request, target_path) {
                    metrics::record_request(method, response.status().as_u16(), start);
                    return response;
                }
            }
            next.run(request).await
        }
    };

    metrics::record_request(method, response.status().as_u16(), start);
    response
}

fn apply_rewrite(request: &mut Request<Body>, target_path: &str) -> Result<(), Response> {
    let uri = rewrite_uri(request.uri(), target_path).map_err(|e| {
        tracing::error!(
            request_id = %request.request_id(),
            target = %target_path,
            error = %e,
            "Invalid rewrite target"
        );
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })?;

    let original = request.uri().path().to_string();
    tracing::trace!(from = %original, to = %target_path, "Rewriting request");
    *request.uri_mut() = uri;
    request.extensions_mut().insert(OriginalPath(original));
    Ok(())
}
