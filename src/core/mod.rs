//! Core building blocks: configuration, error types, and the circuit
//! breaker state machine shared by all outbound traffic.

pub mod circuit_breaker;
pub mod config;
pub mod error;
