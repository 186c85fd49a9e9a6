//! # Routing
//!
//! Service registry, route table, and backend path templating. The pieces
//! here answer "which service, which backend path" for an incoming request;
//! actually sending it upstream is the proxy layer's job.

pub mod registry;
pub mod routes;
pub mod template;

pub use registry::ServiceRegistry;
pub use routes::{default_routes, RouteDescriptor};
pub use template::render_backend_path;
