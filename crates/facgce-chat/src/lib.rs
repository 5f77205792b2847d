//! HTTP boundary for the chord explorer's chat assistant.
//!
//! A single `POST /api/chat` endpoint validates the conversation payload,
//! applies a per-client sliding-window rate limit, and forwards to the
//! language-model completion API. Every failure mode maps to a distinct
//! status code the client can surface inline; nothing is retried here.

pub mod rate_limit;
pub mod server;
pub mod types;
pub mod upstream;

pub use rate_limit::RateLimiter;
pub use server::{router, run, ChatState, ServeConfig, MAX_BODY_BYTES, MAX_MESSAGES};
pub use types::{ChatMessage, ChatRequest, ChatResponse, ErrorBody, Role};
pub use upstream::{
    AnthropicClient, UpstreamConfig, UpstreamError, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_UPSTREAM_URL,
};
