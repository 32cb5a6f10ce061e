//! Proxy listener and per-request transcoding pipeline.
//!
//! # Responsibilities
//! - Resolve request/response codec chains from headers
//! - Rewrite the request body before forwarding upstream
//! - Rewrite the upstream response body before returning it
//! - Map every failure to an HTTP error response (nothing is fatal)

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{
        header,
        uri::{Authority, PathAndQuery, Scheme},
        HeaderValue, Request, Response, StatusCode, Uri,
    },
    response::IntoResponse,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::codec::parse_chain;
use crate::error::CodecError;
use crate::schema::SchemaRegistry;

/// Header naming the request codec chain.
pub const REQ_CODEC_HEADER: &str = "req-codec";
/// Header naming the response codec chain; defaults to the inverted
/// request chain when absent.
pub const RES_CODEC_HEADER: &str = "res-codec";

/// State injected into the proxy handler.
#[derive(Clone)]
pub struct ProxyState {
    pub registry: Arc<SchemaRegistry>,
    pub client: Client<HttpConnector, Body>,
    /// Content-type stamped on forwarded requests; `None` leaves the
    /// original header untouched.
    pub forward_content_type: Option<HeaderValue>,
}

impl ProxyState {
    pub fn new(registry: Arc<SchemaRegistry>, forward_content_type: Option<HeaderValue>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            registry,
            client,
            forward_content_type,
        }
    }
}

/// Per-request pipeline failure, mapped to an HTTP error response.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("missing {REQ_CODEC_HEADER} header")]
    MissingCodecHeader,

    #[error("codec header is not valid ascii")]
    NonAsciiHeader,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("request names no upstream host")]
    MissingHost,

    #[error("could not build upstream uri: {0}")]
    UpstreamUri(String),

    #[error("failed to read request body: {0}")]
    RequestBody(String),

    #[error("failed to read upstream response body: {0}")]
    ResponseBody(String),

    #[error("upstream request failed: {0}")]
    Upstream(String),
}

impl ProxyError {
    fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let body = format!("wiregate was unable to proxy the request: {self}");
        (self.status(), body).into_response()
    }
}

/// HTTP listener that transcodes bodies as they pass through.
pub struct ProxyServer {
    router: Router,
}

impl ProxyServer {
    pub fn new(state: ProxyState) -> Self {
        let router = Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http());
        Self { router }
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "proxy server started");
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;
        tracing::info!("proxy server stopped");
        Ok(())
    }
}

async fn proxy_handler(
    State(state): State<ProxyState>,
    request: Request<Body>,
) -> axum::response::Response {
    match transcode(&state, request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(error = %err, "request transcoding failed");
            err.into_response()
        }
    }
}

async fn transcode(
    state: &ProxyState,
    request: Request<Body>,
) -> Result<Response<Body>, ProxyError> {
    let req_spec = request
        .headers()
        .get(REQ_CODEC_HEADER)
        .ok_or(ProxyError::MissingCodecHeader)?
        .to_str()
        .map_err(|_| ProxyError::NonAsciiHeader)?;
    let req_chain = parse_chain(req_spec, &state.registry)?;

    let res_chain = match request.headers().get(RES_CODEC_HEADER) {
        Some(value) => {
            let spec = value.to_str().map_err(|_| ProxyError::NonAsciiHeader)?;
            parse_chain(spec, &state.registry)?
        }
        None => req_chain.inverted(),
    };

    tracing::debug!(
        method = %request.method(),
        path = %request.uri().path(),
        req_chain = ?req_chain.names(),
        res_chain = ?res_chain.names(),
        "transcoding request"
    );

    let (parts, body) = request.into_parts();
    let body_bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|e| ProxyError::RequestBody(e.to_string()))?;
    // fail before the upstream is ever contacted
    let encoded = req_chain.encode_all(&body_bytes)?;

    let uri = upstream_uri(&parts)?;
    let mut builder = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .version(parts.version);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in parts.headers.iter() {
            headers.append(name.clone(), value.clone());
        }
        // the body was rewritten; its length comes from the new buffer
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRANSFER_ENCODING);
        if let Some(content_type) = &state.forward_content_type {
            headers.insert(header::CONTENT_TYPE, content_type.clone());
        }
    }
    let upstream_request = builder
        .body(Body::from(encoded))
        .map_err(|e| ProxyError::UpstreamUri(e.to_string()))?;

    let upstream_response = state
        .client
        .request(upstream_request)
        .await
        .map_err(|e| ProxyError::Upstream(e.to_string()))?;

    let (res_parts, res_body) = upstream_response.into_parts();
    let res_bytes = axum::body::to_bytes(Body::new(res_body), usize::MAX)
        .await
        .map_err(|e| ProxyError::ResponseBody(e.to_string()))?;
    // a response that fails to decode is discarded, not relayed
    let decoded = res_chain.decode_all(&res_bytes)?;

    let mut builder = Response::builder().status(res_parts.status);
    if let Some(headers) = builder.headers_mut() {
        for (name, value) in res_parts.headers.iter() {
            headers.append(name.clone(), value.clone());
        }
        headers.remove(header::TRANSFER_ENCODING);
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(decoded.len()));
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }
    builder
        .body(Body::from(decoded))
        .map_err(|e| ProxyError::ResponseBody(e.to_string()))
}

/// Upstream target: the request's own authority (absolute-form URI) or the
/// Host header, always over plain HTTP.
fn upstream_uri(parts: &axum::http::request::Parts) -> Result<Uri, ProxyError> {
    let mut uri_parts = parts.uri.clone().into_parts();
    if uri_parts.authority.is_none() {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .ok_or(ProxyError::MissingHost)?;
        let authority = Authority::from_str(host).map_err(|_| ProxyError::MissingHost)?;
        uri_parts.authority = Some(authority);
    }
    if uri_parts.scheme.is_none() {
        uri_parts.scheme = Some(Scheme::HTTP);
    }
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    Uri::from_parts(uri_parts).map_err(|e| ProxyError::UpstreamUri(e.to_string()))
}
