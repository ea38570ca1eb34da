//! Forwarding to the page renderer.
//!
//! # Responsibilities
//! - Send rewritten and passed-through requests to the renderer
//! - Preserve the client's Host header so the renderer sees the subdomain
//! - Strip hop-by-hop headers in both directions
//! - Tell the renderer the client-visible path of rewritten requests
//!
//! # Design Decisions
//! - Single upstream, no retries: a failed render is answered with 502
//! - Bodies stream through without buffering

use axum::{
    body::Body,
    http::{
        header,
        uri::{Authority, InvalidUri, InvalidUriParts, PathAndQuery, Scheme},
        HeaderMap, HeaderName, HeaderValue, Request, Uri, Version,
    },
    response::Response,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::http::response::OriginalPath;

const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
const X_ORIGINAL_PATH: HeaderName = HeaderName::from_static("x-original-path");

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream address: {0}")]
    InvalidAddress(#[from] InvalidUri),

    #[error("failed to build upstream URI: {0}")]
    InvalidUri(#[from] InvalidUriParts),

    #[error("upstream request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),
}

/// HTTP client bound to the renderer address.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client<HttpConnector, Body>,
    authority: Authority,
}

impl UpstreamClient {
    pub fn new(address: &str, connect_timeout: Duration) -> Result<Self, UpstreamError> {
        let authority = Authority::from_str(address)?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self { client, authority })
    }

    /// Forward `request` to the renderer and return its response.
    pub async fn forward(&self, request: Request<Body>) -> Result<Response, UpstreamError> {
        let (mut parts, body) = request.into_parts();

        // The renderer speaks HTTP/1.1 whatever the client negotiated.
        parts.version = Version::HTTP_11;
        ensure_host(&mut parts.headers, &parts.uri);
        parts.uri = self.upstream_uri(&parts.uri)?;
        strip_hop_by_hop(&mut parts.headers);
        if let Some(host) = parts.headers.get(header::HOST).cloned() {
            parts.headers.insert(X_FORWARDED_HOST, host);
        }
        parts.headers.remove(X_ORIGINAL_PATH);
        if let Some(OriginalPath(original)) = parts.extensions.get::<OriginalPath>() {
            if let Ok(value) = HeaderValue::from_str(original) {
                parts.headers.insert(X_ORIGINAL_PATH, value);
            }
        }

        let response: axum::http::Response<hyper::body::Incoming> =
            self.client.request(Request::from_parts(parts, body)).await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }

    fn upstream_uri(&self, uri: &Uri) -> Result<Uri, UpstreamError> {
        let mut uri_parts = uri.clone().into_parts();
        uri_parts.scheme = Some(Scheme::HTTP);
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Ok(Uri::from_parts(uri_parts)?)
    }
}

/// HTTP/2 requests carry the client's host in `:authority` only.
fn ensure_host(headers: &mut HeaderMap, uri: &Uri) {
    if headers.contains_key(header::HOST) {
        return;
    }
    if let Some(value) = uri.authority().and_then(|a| HeaderValue::from_str(a.as_str()).ok()) {
        headers.insert(header::HOST, value);
    }
}

fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(&name);
    }
}
