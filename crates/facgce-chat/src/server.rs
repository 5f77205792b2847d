//! The chat endpoint: validation ladder, rate limiting, forwarding.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::to_bytes,
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::rate_limit::RateLimiter;
use crate::types::{ChatMessage, ChatResponse, ErrorBody};
use crate::upstream::{AnthropicClient, UpstreamConfig};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 10_240;
/// Longest accepted conversation.
pub const MAX_MESSAGES: usize = 20;

/// Shared state behind the router. The rate limiter is injected so its
/// lifecycle is owned by whoever builds the server, not by this module.
#[derive(Clone)]
pub struct ChatState {
    pub limiter: Arc<Mutex<RateLimiter>>,
    pub upstream: Arc<AnthropicClient>,
    /// Upstream credential captured at startup; absent means every chat
    /// request fails with 500 until the process is restarted with one.
    pub api_key: Option<Arc<str>>,
}

pub fn router(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn handle_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The full validation ladder, in order: content type, body size, rate
/// limit, credential, payload shape, upstream. Each failure returns its
/// own status code with a message the client shows inline.
async fn handle_chat(State(state): State<ChatState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let content_type = parts
        .headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type.contains("application/json") {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Content-Type must be application/json",
        );
    }

    let Ok(bytes) = to_bytes(body, MAX_BODY_BYTES).await else {
        return error_response(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large");
    };

    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client = client_key(&parts.headers, peer);
    let admitted = state
        .limiter
        .lock()
        .expect("rate limiter lock")
        .check(&client);
    if !admitted {
        warn!(client = %client, "rate limited");
        return error_response(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many requests. Please wait a minute.",
        );
    }

    let Some(api_key) = state.api_key.as_deref() else {
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured");
    };

    let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
        return error_response(StatusCode::BAD_REQUEST, "Request body must be valid JSON");
    };

    let Some(raw_messages) = value.get("messages").and_then(|m| m.as_array()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "messages must be a non-empty array",
        );
    };
    if raw_messages.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "messages must be a non-empty array",
        );
    }
    if raw_messages.len() > MAX_MESSAGES {
        return error_response(StatusCode::BAD_REQUEST, "Too many messages (max 20)");
    }

    let system_prompt = match value.get("systemPrompt").and_then(|s| s.as_str()) {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "systemPrompt must be a non-empty string",
            )
        }
    };

    let messages: Vec<ChatMessage> =
        match serde_json::from_value(serde_json::Value::Array(raw_messages.clone())) {
            Ok(messages) => messages,
            Err(_) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "messages entries must have a user or assistant role and string content",
                )
            }
        };

    match state.upstream.complete(api_key, system_prompt, &messages).await {
        Ok(content) => (StatusCode::OK, Json(ChatResponse { content })).into_response(),
        Err(error) => {
            warn!(%error, "upstream completion failed");
            error_response(StatusCode::BAD_GATEWAY, &error.to_string())
        }
    }
}

/// Client identity for rate limiting: first forwarded-for hop, else the
/// socket address, else a shared bucket.
fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    match peer {
        Some(addr) => addr.ip().to_string(),
        None => "unknown".to_string(),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Server configuration assembled by the binary.
pub struct ServeConfig {
    pub port: u16,
    pub upstream: UpstreamConfig,
    pub rate_window: Duration,
    pub rate_max_requests: usize,
}

/// Bind and serve until shutdown. The credential is read once from
/// `ANTHROPIC_API_KEY`; it never lives in a config file.
pub async fn run(config: ServeConfig) -> Result<()> {
    let api_key = std::env::var("ANTHROPIC_API_KEY").ok();
    if api_key.is_none() {
        warn!("ANTHROPIC_API_KEY is not set; chat requests will fail with 500");
    }

    let state = ChatState {
        limiter: Arc::new(Mutex::new(RateLimiter::new(
            config.rate_window,
            config.rate_max_requests,
        ))),
        upstream: Arc::new(AnthropicClient::new(config.upstream)),
        api_key: api_key.map(Into::into),
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("binding chat proxy to port {}", config.port))?;
    info!(port = config.port, "chat proxy listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("serving chat proxy")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_for_takes_the_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        assert_eq!(client_key(&headers, None), "203.0.113.9");
    }

    #[test]
    fn socket_address_is_the_fallback() {
        let headers = HeaderMap::new();
        let peer: SocketAddr = "192.0.2.4:5050".parse().unwrap();
        assert_eq!(client_key(&headers, Some(peer)), "192.0.2.4");
        assert_eq!(client_key(&headers, None), "unknown");
    }

    #[test]
    fn empty_forwarded_header_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "".parse().unwrap());
        assert_eq!(client_key(&headers, None), "unknown");
    }
}
