//! # Gateway Server
//!
//! Wires configuration, routing, middleware, and the proxy executor into a
//! running axum application.

pub mod server;

pub use server::{build_app, AppState, GatewayServer};
