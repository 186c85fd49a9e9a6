//! # HTTP Server Module
//!
//! Builds the axum application and runs it. The application is assembled
//! in layers:
//!
//! - `/health` is public and unauthenticated
//! - `/api/v1/auth/*` proxies to the IAM service under the strict rate limit
//! - every other `/api/v1` route passes the general rate limit, the JWT
//!   gate, and the response cache before reaching the proxy executor
//!
//! ## Rust Concepts Used
//!
//! - `Arc<T>` for sharing server state across async tasks
//! - Handler closures capturing their route descriptor, so the router
//!   itself stays stateless
//! - Tower layers for cross-cutting middleware

use crate::caching::{CacheStore, InMemoryCache, RedisCache};
use crate::core::circuit_breaker::CircuitBreakerRegistry;
use crate::core::config::GatewayConfig;
use crate::core::error::{GatewayError, GatewayResult};
use crate::middleware::{
    authenticate, cache_responses, cors_layer, enforce_rate_limit, propagate_request_id,
    AuthValidator, FixedWindowLimiter, ResponseCache,
};
use crate::proxy::ProxyExecutor;
use crate::routing::{default_routes, RouteDescriptor, ServiceRegistry};
use axum::{
    extract::{RawPathParams, Request},
    http::Method,
    response::Response,
    routing::{get, MethodFilter, MethodRouter},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Everything the application needs at request time
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub proxy: Arc<ProxyExecutor>,
    pub auth: Arc<AuthValidator>,
    pub general_limiter: Arc<FixedWindowLimiter>,
    pub strict_limiter: Arc<FixedWindowLimiter>,
    pub cache: Arc<ResponseCache>,
}

impl AppState {
    /// Build all shared components from configuration. Connects to Redis
    /// when a URL is configured, otherwise caches in process memory.
    pub async fn from_config(config: GatewayConfig) -> GatewayResult<Self> {
        let registry = ServiceRegistry::from_table(&config.services)?;
        info!(services = registry.len(), "service registry loaded");

        let breakers = Arc::new(
            CircuitBreakerRegistry::new(config.circuit_breaker.clone()).with_transition_hook(
                Arc::new(|service, from, to| {
                    info!(service, %from, %to, "circuit breaker state change");
                }),
            ),
        );

        let proxy = Arc::new(ProxyExecutor::new(&config, registry, breakers)?);

        let store: Arc<dyn CacheStore> = match &config.cache.redis_url {
            Some(url) => {
                let redis = RedisCache::connect(url)
                    .await
                    .map_err(|e| GatewayError::config(format!("Redis connection failed: {}", e)))?;
                info!("response cache backed by redis");
                Arc::new(redis)
            }
            None => {
                info!("response cache backed by process memory");
                Arc::new(InMemoryCache::new())
            }
        };

        Ok(Self {
            auth: Arc::new(AuthValidator::new(&config.jwt_secret)),
            general_limiter: Arc::new(FixedWindowLimiter::new(
                config.rate_limit.general_limit,
                config.rate_limit.window,
                config.rate_limit.trust_forwarded_for,
            )),
            strict_limiter: Arc::new(FixedWindowLimiter::new(
                config.rate_limit.strict_limit,
                config.rate_limit.window,
                config.rate_limit.trust_forwarded_for,
            )),
            cache: Arc::new(ResponseCache::new(store, config.cache.ttl)),
            proxy,
            config: Arc::new(config),
        })
    }
}

/// Assemble the full application router
pub fn build_app(state: &AppState) -> GatewayResult<Router> {
    let auth_routes = proxied_routes(Arc::clone(&state.proxy), auth_route_table())?.route_layer(
        axum::middleware::from_fn_with_state(
            Arc::clone(&state.strict_limiter),
            enforce_rate_limit,
        ),
    );

    let mut protected = proxied_routes(Arc::clone(&state.proxy), default_routes())?
        .route("/overview/status", get(platform_status));

    if state.config.cache.enabled {
        protected = protected.route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state.cache),
            cache_responses,
        ));
    }

    let protected = protected
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state.auth),
            authenticate,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state.general_limiter),
            enforce_rate_limit,
        ));

    // ServiceBuilder applies top-down: tracing outermost, then request
    // IDs so every later span and response carries one, then CORS
    let app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", auth_routes.merge(protected))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(propagate_request_id))
                .layer(cors_layer(&state.config.allowed_origins)),
        );

    Ok(app)
}

/// Authentication endpoints, forwarded to IAM without the JWT gate
fn auth_route_table() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::new(Method::POST, "/auth/login", "iam", "/api/v1/auth/login"),
        RouteDescriptor::new(Method::POST, "/auth/refresh", "iam", "/api/v1/auth/refresh"),
    ]
}

/// Register proxied route descriptors into an axum router.
///
/// Descriptors sharing a gateway path collapse into one `MethodRouter`;
/// registering the same path twice would panic inside axum.
fn proxied_routes(
    proxy: Arc<ProxyExecutor>,
    descriptors: Vec<RouteDescriptor>,
) -> GatewayResult<Router> {
    let mut by_path: BTreeMap<String, Vec<Arc<RouteDescriptor>>> = BTreeMap::new();
    for descriptor in descriptors {
        by_path
            .entry(descriptor.path.clone())
            .or_default()
            .push(Arc::new(descriptor));
    }

    let mut router = Router::new();
    for (path, descriptors) in by_path {
        let mut method_router = MethodRouter::new();
        for descriptor in descriptors {
            let filter = MethodFilter::try_from(descriptor.method.clone()).map_err(|e| {
                GatewayError::config(format!(
                    "Unsupported method for route {}: {}",
                    descriptor.path, e
                ))
            })?;
            let proxy = Arc::clone(&proxy);
            method_router = method_router.on(
                filter,
                move |params: RawPathParams, request: Request| async move {
                    forward(proxy, descriptor, params, request).await
                },
            );
        }
        router = router.route(&path, method_router);
    }

    Ok(router)
}

async fn forward(
    proxy: Arc<ProxyExecutor>,
    descriptor: Arc<RouteDescriptor>,
    params: RawPathParams,
    request: Request,
) -> GatewayResult<Response> {
    let params: Vec<(String, String)> = params
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    proxy.forward(&descriptor, &params, request).await
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "operational",
        "service": "api-gateway",
    }))
}

/// Local aggregate served instead of proxying; the per-service entries are
/// static until the health prober lands.
/// TODO: fold real per-service health from breaker state into this payload
async fn platform_status() -> Json<Value> {
    Json(json!({
        "data": {
            "platform": "operational",
            "services": {
                "api_gateway": "operational",
                "iam": "operational",
                "risk_assessment": "operational",
                "news_aggregator": "operational",
                "ingestion": "operational",
                "normalization": "operational",
                "audit_logging": "operational",
                "ml_infrastructure": "operational",
                "nlp_service": "operational",
                "graph_intelligence": "operational",
                "xai_service": "operational",
                "model_serving": "operational",
                "model_monitoring": "operational",
                "scenario_simulation": "operational",
                "war_gaming": "operational",
                "digital_twins": "operational",
                "policy_impact": "operational",
                "multi_region": "operational",
                "data_residency": "operational",
                "federated_learning": "operational",
                "mobile_api": "operational",
                "compliance_automation": "operational",
                "performance_optimization": "operational",
                "cost_optimization": "operational",
                "advanced_rd": "operational",
                "security_certification": "operational",
                "continuous_improvement": "operational",
                "geospatial": "operational",
                "intelligence": "operational",
            },
            "compliance": {
                "gdpr": "compliant",
                "lgpd": "compliant",
            },
            "timestamp": Utc::now().to_rfc3339(),
        }
    }))
}

/// Owns the application and its listen address
pub struct GatewayServer {
    state: AppState,
    app: Router,
}

impl GatewayServer {
    pub async fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let state = AppState::from_config(config).await?;
        let app = build_app(&state)?;
        Ok(Self { state, app })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind and serve until the shutdown signal fires
    pub async fn start(self) -> GatewayResult<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::internal(format!("Failed to bind {}: {}", addr, e)))?;

        self.spawn_limiter_sweepers();

        info!(%addr, environment = %self.state.config.environment, "gateway listening");

        axum::serve(
            listener,
            self.app
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| GatewayError::internal(format!("Server error: {}", e)))
    }

    /// Periodically drop elapsed rate limit windows so idle clients do not
    /// accumulate in memory
    fn spawn_limiter_sweepers(&self) {
        for limiter in [
            Arc::clone(&self.state.general_limiter),
            Arc::clone(&self.state.strict_limiter),
        ] {
            let period = limiter.window();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(period);
                loop {
                    ticker.tick().await;
                    limiter.sweep();
                }
            });
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received, draining connections");
}
