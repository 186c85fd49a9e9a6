//! # Route Table
//!
//! Static descriptors mapping every gateway route to its backing service
//! and backend path template. Descriptors are created once at startup when
//! routes are registered into the axum router and never mutated afterwards;
//! method+path matching itself is the router's job, independent of this
//! table.
//!
//! Gateway paths here are relative to the `/api/v1` prefix the server nests
//! them under; backend path templates are absolute. The two usually agree,
//! but not always (e.g. `/compliance/audit` forwards to the audit service's
//! compliance-report endpoint), which is why both are spelled out.

use axum::http::Method;

/// One registered gateway route
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// HTTP method this route answers
    pub method: Method,

    /// Gateway path pattern (axum syntax, `:param` captures), relative to
    /// the `/api/v1` group
    pub path: String,

    /// Logical name of the backing service
    pub service: String,

    /// Backend path template with `:param` placeholders matching the
    /// gateway pattern's captures
    pub backend_path: String,
}

impl RouteDescriptor {
    pub fn new(method: Method, path: &str, service: &str, backend_path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            service: service.to_string(),
            backend_path: backend_path.to_string(),
        }
    }
}

fn route(method: Method, path: &str, service: &str, backend_path: &str) -> RouteDescriptor {
    RouteDescriptor::new(method, path, service, backend_path)
}

/// The platform's full proxied route table.
///
/// Grouped by domain the way the backend teams own them; keep groups
/// together when adding routes.
pub fn default_routes() -> Vec<RouteDescriptor> {
    // `Method`'s variants are associated constants, not enum variants, so
    // they cannot be `use`d; bind the ones the table needs instead.
    const GET: Method = Method::GET;
    const POST: Method = Method::POST;
    const PUT: Method = Method::PUT;
    const DELETE: Method = Method::DELETE;

    vec![
        // Strategic entity management
        route(GET, "/entities", "entity-service", "/api/v1/entities"),
        route(GET, "/entities/:id", "entity-service", "/api/v1/entities/:id"),
        route(POST, "/entities", "entity-service", "/api/v1/entities"),
        route(GET, "/entities/:id/context", "entity-service", "/api/v1/entities/:id/context"),
        route(GET, "/entities/:id/intelligence", "entity-service", "/api/v1/entities/:id/intelligence"),
        // Risk assessment
        route(POST, "/risks/assess", "risk-assessment", "/api/v1/risks/assess"),
        route(GET, "/risks/trends", "risk-assessment", "/api/v1/risks/trends"),
        route(GET, "/risks/profiles", "risk-assessment", "/api/v1/risks/profiles"),
        route(GET, "/risks/:id", "risk-assessment", "/api/v1/risks/:id"),
        route(POST, "/risks/alerts", "risk-assessment", "/api/v1/risks/alerts"),
        // Executive risk profiles
        route(GET, "/risk-profiles", "risk-assessment", "/api/v1/risk-profiles"),
        route(GET, "/risk-profiles/:id", "risk-assessment", "/api/v1/risk-profiles/:id"),
        route(POST, "/risk-profiles", "risk-assessment", "/api/v1/risk-profiles"),
        // Scenario simulation
        route(POST, "/scenarios", "scenario-simulation", "/api/v1/scenarios"),
        route(GET, "/scenarios", "scenario-simulation", "/api/v1/scenarios"),
        route(GET, "/scenarios/:id", "scenario-simulation", "/api/v1/scenarios/:id"),
        route(POST, "/scenarios/:id/run", "scenario-simulation", "/api/v1/scenarios/:id/run"),
        route(GET, "/scenarios/:id/results", "scenario-simulation", "/api/v1/scenarios/:id/results"),
        route(GET, "/scenarios/:id/compare", "scenario-simulation", "/api/v1/scenarios/:id/compare"),
        // Geospatial intelligence
        route(POST, "/geospatial/query", "geospatial-service", "/api/v1/geo/query"),
        route(GET, "/geospatial/zones", "geospatial-service", "/api/v1/geo/zones"),
        route(GET, "/geospatial/context", "geospatial-service", "/api/v1/geo/context"),
        route(GET, "/geospatial/supply-chains", "geospatial-service", "/api/v1/geo/supply-chains"),
        // OSINT analysis
        route(GET, "/osint/analysis", "news-aggregator", "/api/v1/osint/analysis"),
        route(GET, "/osint/signals", "news-aggregator", "/api/v1/osint/signals"),
        route(GET, "/osint/feed", "news-aggregator", "/api/v1/osint/feed"),
        route(POST, "/osint/query", "news-aggregator", "/api/v1/osint/query"),
        // News
        route(GET, "/news/articles", "news-aggregator", "/api/v1/news/articles"),
        route(POST, "/news/sources", "news-aggregator", "/api/v1/news/sources"),
        // Executive briefings
        route(GET, "/briefings", "intelligence-service", "/api/v1/briefings"),
        route(POST, "/briefings", "intelligence-service", "/api/v1/briefings"),
        route(GET, "/briefings/:id", "intelligence-service", "/api/v1/briefings/:id"),
        // Compliance & audit
        route(GET, "/compliance/audit", "audit-service", "/api/v1/audit/compliance/report"),
        route(GET, "/compliance/lineage", "audit-service", "/api/v1/compliance/lineage"),
        route(GET, "/compliance/status", "audit-service", "/api/v1/compliance/status"),
        // Audit logging
        route(GET, "/audit/logs", "audit-service", "/api/v1/audit/logs"),
        route(GET, "/audit/logs/:id", "audit-service", "/api/v1/audit/logs/:id"),
        route(POST, "/audit/events", "audit-service", "/api/v1/audit/events"),
        route(GET, "/audit/compliance/report", "audit-service", "/api/v1/audit/compliance/report"),
        // Platform overview (GET /overview/status is served locally)
        route(GET, "/overview/signals", "intelligence-service", "/api/v1/overview/signals"),
        route(GET, "/overview/kpis", "intelligence-service", "/api/v1/overview/kpis"),
        // Data ingestion
        route(GET, "/ingestion/sources", "ingestion-service", "/api/v1/ingestion/sources"),
        route(POST, "/ingestion/sources", "ingestion-service", "/api/v1/ingestion/sources"),
        route(GET, "/ingestion/sources/:id", "ingestion-service", "/api/v1/ingestion/sources/:id"),
        route(POST, "/ingestion/sources/:id/data", "ingestion-service", "/api/v1/ingestion/sources/:id/data"),
        route(POST, "/ingestion/sources/:id/trigger", "ingestion-service", "/api/v1/ingestion/sources/:id/trigger"),
        route(GET, "/ingestion/status", "ingestion-service", "/api/v1/ingestion/status"),
        // Data normalization
        route(GET, "/normalization/rules", "normalization-service", "/api/v1/normalization/rules"),
        route(POST, "/normalization/rules", "normalization-service", "/api/v1/normalization/rules"),
        route(GET, "/normalization/rules/:id", "normalization-service", "/api/v1/normalization/rules/:id"),
        route(PUT, "/normalization/rules/:id", "normalization-service", "/api/v1/normalization/rules/:id"),
        route(DELETE, "/normalization/rules/:id", "normalization-service", "/api/v1/normalization/rules/:id"),
        route(GET, "/normalization/quality/:data_id", "normalization-service", "/api/v1/normalization/quality/:data_id"),
        route(GET, "/normalization/stats", "normalization-service", "/api/v1/normalization/stats"),
        // ML infrastructure
        route(GET, "/ml/models", "ml-infrastructure", "/api/v1/models"),
        route(POST, "/ml/models/register", "ml-infrastructure", "/api/v1/models/register"),
        route(GET, "/ml/models/:model_name", "ml-infrastructure", "/api/v1/models/:model_name"),
        route(POST, "/ml/models/:model_name/predict", "ml-infrastructure", "/api/v1/models/:model_name/predict"),
        route(GET, "/ml/experiments", "ml-infrastructure", "/api/v1/experiments"),
        route(POST, "/ml/experiments/runs", "ml-infrastructure", "/api/v1/experiments/runs"),
        // NLP
        route(POST, "/nlp/ner", "nlp-service", "/api/v1/nlp/ner"),
        route(POST, "/nlp/sentiment", "nlp-service", "/api/v1/nlp/sentiment"),
        route(POST, "/nlp/classify", "nlp-service", "/api/v1/nlp/classify"),
        route(POST, "/nlp/summarize", "nlp-service", "/api/v1/nlp/summarize"),
        route(POST, "/nlp/process", "nlp-service", "/api/v1/nlp/process"),
        // Graph intelligence
        route(POST, "/graph/entities/resolve", "graph-intelligence", "/api/v1/graph/entities/resolve"),
        route(GET, "/graph/entities/:id/relationships", "graph-intelligence", "/api/v1/graph/entities/:id/relationships"),
        route(GET, "/graph/entities/:id/neighbors", "graph-intelligence", "/api/v1/graph/entities/:id/neighbors"),
        route(GET, "/graph/risk/propagate", "graph-intelligence", "/api/v1/graph/risk/propagate"),
        route(POST, "/graph/risk/propagate", "graph-intelligence", "/api/v1/graph/risk/propagate"),
        route(GET, "/graph/communities", "graph-intelligence", "/api/v1/graph/communities"),
        route(GET, "/graph/centrality", "graph-intelligence", "/api/v1/graph/centrality"),
        route(GET, "/graph/path", "graph-intelligence", "/api/v1/graph/path"),
        route(GET, "/graph/stats", "graph-intelligence", "/api/v1/graph/stats"),
        // Explainable AI
        route(POST, "/xai/explain", "xai-service", "/api/v1/xai/explain"),
        route(GET, "/xai/models/:model_id/features", "xai-service", "/api/v1/xai/models/:model_id/features"),
        route(GET, "/xai/predictions/:prediction_id/explanation", "xai-service", "/api/v1/xai/predictions/:prediction_id/explanation"),
        route(POST, "/xai/batch/explain", "xai-service", "/api/v1/xai/batch/explain"),
        // Model serving
        route(GET, "/models", "model-serving", "/api/v1/models"),
        route(POST, "/models/predict", "model-serving", "/api/v1/models/predict"),
        route(GET, "/models/:model_name/info", "model-serving", "/api/v1/models/:model_name/info"),
        // Model monitoring
        route(POST, "/monitoring/drift/check", "model-monitoring", "/api/v1/monitoring/drift/check"),
        route(POST, "/monitoring/performance", "model-monitoring", "/api/v1/monitoring/performance"),
        route(GET, "/monitoring/models/:model_name/performance", "model-monitoring", "/api/v1/monitoring/models/:model_name/performance"),
        route(GET, "/monitoring/models/:model_name/health", "model-monitoring", "/api/v1/monitoring/models/:model_name/health"),
        route(GET, "/monitoring/alerts", "model-monitoring", "/api/v1/monitoring/alerts"),
        // Simulations
        route(GET, "/simulations", "scenario-simulation", "/api/v1/simulations"),
        route(POST, "/simulations/scenarios", "scenario-simulation", "/api/v1/simulations/scenarios"),
        route(GET, "/simulations/compare", "scenario-simulation", "/api/v1/simulations/compare"),
        route(GET, "/simulations/:simulation_id", "scenario-simulation", "/api/v1/simulations/:simulation_id"),
        // Defensive war-gaming
        route(GET, "/wargaming/games", "war-gaming", "/api/v1/wargaming/games"),
        route(POST, "/wargaming/scenarios", "war-gaming", "/api/v1/wargaming/scenarios"),
        route(GET, "/wargaming/games/:game_id", "war-gaming", "/api/v1/wargaming/games/:game_id"),
        route(POST, "/wargaming/risk-escalation", "war-gaming", "/api/v1/wargaming/risk-escalation"),
        // Digital twins
        route(GET, "/twins", "digital-twins", "/api/v1/twins"),
        route(POST, "/twins", "digital-twins", "/api/v1/twins"),
        route(GET, "/twins/:twin_id", "digital-twins", "/api/v1/twins/:twin_id"),
        route(PUT, "/twins/:twin_id", "digital-twins", "/api/v1/twins/:twin_id"),
        route(POST, "/twins/:twin_id/simulate", "digital-twins", "/api/v1/twins/:twin_id/simulate"),
        route(GET, "/twins/:twin_id/sync", "digital-twins", "/api/v1/twins/:twin_id/sync"),
        // Policy impact analysis
        route(GET, "/policy/analyses", "policy-impact", "/api/v1/policy/analyses"),
        route(POST, "/policy/analyze", "policy-impact", "/api/v1/policy/analyze"),
        route(GET, "/policy/analyses/:analysis_id", "policy-impact", "/api/v1/policy/analyses/:analysis_id"),
        route(POST, "/policy/compare", "policy-impact", "/api/v1/policy/compare"),
        route(POST, "/policy/visualize", "policy-impact", "/api/v1/policy/visualize"),
        // Multi-region
        route(GET, "/regions", "multi-region", "/api/v1/regions"),
        route(POST, "/regions/failover", "multi-region", "/api/v1/regions/failover"),
        route(GET, "/regions/routing", "multi-region", "/api/v1/regions/routing"),
        route(GET, "/regions/health", "multi-region", "/api/v1/regions/health"),
        route(GET, "/regions/:region_id", "multi-region", "/api/v1/regions/:region_id"),
        route(GET, "/regions/:region_id/replication", "multi-region", "/api/v1/regions/:region_id/replication"),
        // Data residency
        route(GET, "/residency/rules", "data-residency", "/api/v1/residency/rules"),
        route(POST, "/residency/validate", "data-residency", "/api/v1/residency/validate"),
        route(POST, "/residency/rules", "data-residency", "/api/v1/residency/rules"),
        route(GET, "/residency/data/:data_id/location", "data-residency", "/api/v1/residency/data/:data_id/location"),
        route(GET, "/residency/compliance", "data-residency", "/api/v1/residency/compliance"),
        // Federated learning
        route(GET, "/federated/models", "federated-learning", "/api/v1/federated/models"),
        route(POST, "/federated/models", "federated-learning", "/api/v1/federated/models"),
        route(GET, "/federated/models/:model_id", "federated-learning", "/api/v1/federated/models/:model_id"),
        route(POST, "/federated/models/:model_id/rounds", "federated-learning", "/api/v1/federated/models/:model_id/rounds"),
        route(GET, "/federated/models/:model_id/rounds/:round_id", "federated-learning", "/api/v1/federated/models/:model_id/rounds/:round_id"),
        route(POST, "/federated/models/:model_id/aggregate", "federated-learning", "/api/v1/federated/models/:model_id/aggregate"),
        route(POST, "/federated/continual/update", "federated-learning", "/api/v1/federated/continual/update"),
        // Mobile API
        route(POST, "/mobile/sessions", "mobile-api", "/api/v1/mobile/sessions"),
        route(GET, "/mobile/dashboard", "mobile-api", "/api/v1/mobile/dashboard"),
        route(POST, "/mobile/offline/sync", "mobile-api", "/api/v1/mobile/offline/sync"),
        route(GET, "/mobile/offline/data", "mobile-api", "/api/v1/mobile/offline/data"),
        route(GET, "/mobile/alerts", "mobile-api", "/api/v1/mobile/alerts"),
        route(POST, "/mobile/notifications/register", "mobile-api", "/api/v1/mobile/notifications/register"),
        // Compliance automation
        route(GET, "/compliance/automation/policies", "compliance-automation", "/api/v1/compliance/policies"),
        route(POST, "/compliance/automation/policies", "compliance-automation", "/api/v1/compliance/policies"),
        route(POST, "/compliance/automation/scan", "compliance-automation", "/api/v1/compliance/scan"),
        route(GET, "/compliance/automation/scan/:scan_id", "compliance-automation", "/api/v1/compliance/scan/:scan_id"),
        route(GET, "/compliance/automation/status", "compliance-automation", "/api/v1/compliance/status"),
        route(POST, "/compliance/automation/evidence/generate", "compliance-automation", "/api/v1/compliance/evidence/generate"),
        // Performance optimization
        route(POST, "/optimization/analyze", "performance-optimization", "/api/v1/optimization/analyze"),
        route(GET, "/optimization/metrics", "performance-optimization", "/api/v1/optimization/metrics"),
        route(POST, "/optimization/apply", "performance-optimization", "/api/v1/optimization/apply"),
        route(GET, "/optimization/slo", "performance-optimization", "/api/v1/optimization/slo"),
        route(POST, "/optimization/benchmark", "performance-optimization", "/api/v1/optimization/benchmark"),
        // Cost optimization
        route(GET, "/cost/analysis", "cost-optimization", "/api/v1/cost/analysis"),
        route(GET, "/cost/recommendations", "cost-optimization", "/api/v1/cost/recommendations"),
        route(POST, "/cost/budgets", "cost-optimization", "/api/v1/cost/budgets"),
        route(GET, "/cost/budgets", "cost-optimization", "/api/v1/cost/budgets"),
        route(GET, "/cost/alerts", "cost-optimization", "/api/v1/cost/alerts"),
        // Advanced R&D
        route(GET, "/rd/projects", "advanced-rd", "/api/v1/rd/projects"),
        route(POST, "/rd/projects", "advanced-rd", "/api/v1/rd/projects"),
        route(POST, "/rd/threats/simulate", "advanced-rd", "/api/v1/rd/threats/simulate"),
        route(GET, "/rd/models/experimental", "advanced-rd", "/api/v1/rd/models/experimental"),
        route(GET, "/rd/partners", "advanced-rd", "/api/v1/rd/partners"),
        // Security certification
        route(GET, "/certifications", "security-certification", "/api/v1/certifications"),
        route(POST, "/certifications/assess", "security-certification", "/api/v1/certifications/assess"),
        route(POST, "/certifications/penetration-test", "security-certification", "/api/v1/security/penetration-test"),
        route(GET, "/certifications/penetration-tests", "security-certification", "/api/v1/security/penetration-tests"),
        route(GET, "/certifications/red-team/exercises", "security-certification", "/api/v1/security/red-team/exercises"),
        route(GET, "/certifications/compliance-status", "security-certification", "/api/v1/security/compliance-status"),
        // Continuous improvement
        route(GET, "/improvement/metrics", "continuous-improvement", "/api/v1/improvement/metrics"),
        route(POST, "/improvement/requests", "continuous-improvement", "/api/v1/improvement/requests"),
        route(GET, "/improvement/requests", "continuous-improvement", "/api/v1/improvement/requests"),
        route(POST, "/improvement/feedback", "continuous-improvement", "/api/v1/improvement/feedback"),
        route(GET, "/improvement/recommendations", "continuous-improvement", "/api/v1/improvement/recommendations"),
    ]
}
