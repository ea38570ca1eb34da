//! Translating routing decisions into HTTP.
//!
//! # Responsibilities
//! - Build redirect and block responses answered at the edge
//! - Rewrite request URIs while keeping the query string
//!
//! # Design Decisions
//! - Block responses carry a plain "Not Found" body
//! - A rewrite target that does not form a valid URI is answered with 500

use axum::{
    body::Body,
    http::{header, uri::PathAndQuery, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::routing::{Location, RoutingDecision};

/// Original request path, attached to rewritten requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPath(pub String);

/// Builds the edge response for terminal decisions. Returns `None` for
/// decisions that continue into the application.
pub fn terminal_response(decision: &RoutingDecision) -> Option<Response> {
    match decision {
        RoutingDecision::Redirect { location, status } => Some(redirect(location, *status)),
        RoutingDecision::Block { status } => Some(blocked(*status)),
        RoutingDecision::Rewrite { .. } | RoutingDecision::PassThrough => None,
    }
}

fn redirect(location: &Location, status: StatusCode) -> Response {
    match HeaderValue::from_str(&location.to_string()) {
        Ok(value) => (status, [(header::LOCATION, value)]).into_response(),
        Err(_) => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn blocked(status: StatusCode) -> Response {
    let mut response = Response::new(Body::from("Not Found"));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}

/// Replaces the path of `uri`, keeping its scheme, authority and query.
pub fn rewrite_uri(uri: &Uri, target_path: &str) -> Result<Uri, axum::http::Error> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{target_path}?{query}"),
        None => target_path.to_string(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query)?);
    Ok(Uri::from_parts(parts)?)
}
