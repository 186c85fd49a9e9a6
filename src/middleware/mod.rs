//! # Gateway Middleware
//!
//! The request-path middleware chain: request ID propagation, CORS, fixed
//! window rate limiting, JWT authentication, and response caching. Each
//! piece is an axum `from_fn` middleware (or a tower layer for CORS) wired
//! together by the server module.
//!
//! Order matters and is fixed: request IDs are assigned outermost so every
//! later log line and error response carries one; rate limiting runs before
//! auth so token validation cannot be used to burn CPU past the limit; the
//! cache sits innermost, directly in front of the proxy.

pub mod auth;
pub mod cache;
pub mod cors;
pub mod rate_limit;
pub mod request_id;

pub use auth::{authenticate, AuthValidator, Claims};
pub use cache::{cache_responses, ResponseCache};
pub use cors::cors_layer;
pub use rate_limit::{enforce_rate_limit, FixedWindowLimiter};
pub use request_id::{propagate_request_id, RequestId, REQUEST_ID_HEADER};
