//! # Atlas Gateway - Core Library Crate
//!
//! The request-dispatch core of the Atlas risk-intelligence platform's API
//! gateway. A single entry point routes client requests across the
//! platform's backend services with circuit breaking, authentication, rate
//! limiting, and response caching along the way.
//!
//! ## Rust Module System Explained (For Developers from Other Languages)
//!
//! Unlike languages with file-based imports (Python, JavaScript), Rust uses
//! a hierarchical module system:
//!
//! - `mod module_name;` declares a module (like `#include` in C++)
//! - `use module_name::item;` imports specific items (like `import` in
//!   Python/JS)
//! - Items are private by default; `pub` makes them public
//! - `pub use` re-exports items, shaping the crate's public API surface
//!
//! ## Request Path
//!
//! ```text
//! client -> request id -> cors -> rate limit -> auth -> cache -> proxy -> backend
//! ```
//!
//! Each arrow is a middleware boundary; any stage can short-circuit with a
//! complete response (a cache hit, a 401, a 429, a breaker rejection).

/// Core functionality: error types, configuration, circuit breakers
pub mod core;

/// Gateway server assembly and lifecycle
pub mod gateway;

/// Request-path middleware: request IDs, CORS, rate limiting, auth, caching
pub mod middleware;

/// Response caching with pluggable stores
pub mod caching;

/// Upstream forwarding with per-service circuit breaking
pub mod proxy;

/// Service registry, route table, and backend path templating
pub mod routing;

/// Main error type used throughout the gateway
pub use crate::core::error::{GatewayError, GatewayResult};

/// Main configuration structure for the gateway
pub use crate::core::config::GatewayConfig;

/// Per-service circuit breakers and their registry
pub use crate::core::circuit_breaker::{BreakerState, CircuitBreaker, CircuitBreakerRegistry};

/// Server entry points
pub use gateway::{build_app, AppState, GatewayServer};
