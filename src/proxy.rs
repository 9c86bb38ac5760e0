//! Same-origin GraphQL forwarding route.
//!
//! The browser-facing app talks to `/api/graphql` on its own origin. This
//! route forwards the body with the caller's `Authorization` and `Cookie`
//! headers to the real backend and always answers 200, so GraphQL clients
//! read failures from the `errors` array instead of an HTTP status.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::signal::{self, ctrl_c};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ServerConfig;
use crate::error::Result;

pub struct ProxyState {
    client: reqwest::Client,
    upstream: Url,
}

impl ProxyState {
    pub fn new(upstream: Url, timeout: Duration) -> Result<Arc<Self>> {
        // Cookies belong to the caller, never to the proxy.
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Arc::new(Self { client, upstream }))
    }

    pub fn with_client(client: reqwest::Client, upstream: Url) -> Arc<Self> {
        Arc::new(Self { client, upstream })
    }
}

pub fn router(state: Arc<ProxyState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/graphql", post(graphql_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "ok"
}

fn error_envelope(message: &str, code: &str) -> Response {
    let body = json!({
        "data": null,
        "errors": [{ "message": message, "extensions": { "code": code } }]
    });
    (StatusCode::OK, axum::Json(body)).into_response()
}

pub async fn graphql_handler(
    State(state): State<Arc<ProxyState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut request = state
        .client
        .post(state.upstream.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(body);

    for name in [AUTHORIZATION, COOKIE] {
        if let Some(value) = headers.get(&name) {
            request = request.header(name, value.clone());
        }
    }

    let upstream = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            warn!("GraphQL upstream unreachable: {}", err);
            return error_envelope("The server is unavailable. Please try again.", "UPSTREAM_UNAVAILABLE");
        }
    };

    let status = upstream.status();
    if !status.is_success() {
        debug!("Normalizing upstream HTTP {} to 200", status);
    }

    let content_type = upstream
        .headers()
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));
    let set_cookies: Vec<HeaderValue> = upstream.headers().get_all(SET_COOKIE).iter().cloned().collect();

    let bytes = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!("Failed to read GraphQL upstream body: {}", err);
            return error_envelope("The server sent an unreadable response.", "UPSTREAM_BODY");
        }
    };

    let mut response = (StatusCode::OK, bytes).into_response();
    let out = response.headers_mut();
    out.insert(CONTENT_TYPE, content_type);
    for cookie in set_cookies {
        out.append(SET_COOKIE, cookie);
    }
    response
}

/// Bind and serve until Ctrl+C / SIGTERM.
pub async fn serve(config: &ServerConfig, state: Arc<ProxyState>) -> Result<()> {
    let address = format!("{}:{}", config.host, config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("GraphQL proxy running on {address}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Proxy shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => warn!("Failed to listen for Ctrl+C: {}", err),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
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
}
