//! # Backend Path Templater
//!
//! Renders a backend path template (`/api/v1/risks/:id`) into a concrete
//! outbound path using the parameters captured by the gateway's own route
//! match, then appends the inbound raw query string untouched.
//!
//! Substitution is first-occurrence-replace per parameter (not global
//! replace-all): each captured parameter, in the order the router exposes
//! them, replaces the first `:`+name it finds.
//!
//! Two quirks are intentional and preserved from the platform's routing
//! contract:
//! - a captured parameter with no placeholder in the template is silently
//!   ignored;
//! - a placeholder with no captured parameter is left literally as `:name`
//!   in the outbound path.

/// Render a backend path from its template, captured parameters, and the
/// inbound raw query string.
pub fn render_backend_path(
    template: &str,
    params: &[(String, String)],
    raw_query: Option<&str>,
) -> String {
    let mut path = template.to_string();

    for (name, value) in params {
        let placeholder = format!(":{}", name);
        path = path.replacen(&placeholder, value, 1);
    }

    if let Some(query) = raw_query {
        if !query.is_empty() {
            path.push('?');
            path.push_str(query);
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_single_parameter() {
        let path = render_backend_path("/api/v1/risks/:id", &params(&[("id", "42")]), None);
        assert_eq!(path, "/api/v1/risks/42");
    }

    #[test]
    fn test_multiple_parameters() {
        let path = render_backend_path(
            "/x/:id/y/:id2",
            &params(&[("id", "7"), ("id2", "9")]),
            None,
        );
        assert_eq!(path, "/x/7/y/9");
    }

    #[test]
    fn test_prefix_parameter_names_do_not_collide() {
        // ":id" is a prefix of ":id2"; first-occurrence replace in router
        // order must still land each value in its own slot.
        let path = render_backend_path(
            "/models/:model_id/rounds/:round_id",
            &params(&[("model_id", "m1"), ("round_id", "r9")]),
            None,
        );
        assert_eq!(path, "/models/m1/rounds/r9");
    }

    #[test]
    fn test_query_string_appended_unmodified() {
        let path = render_backend_path(
            "/api/v1/risks/trends",
            &[],
            Some("window=30d&region=EU%2FWest"),
        );
        assert_eq!(path, "/api/v1/risks/trends?window=30d&region=EU%2FWest");
    }

    #[test]
    fn test_empty_query_string_not_appended() {
        let path = render_backend_path("/api/v1/risks/trends", &[], Some(""));
        assert_eq!(path, "/api/v1/risks/trends");
    }

    #[test]
    fn test_parameter_absent_from_template_ignored() {
        let path = render_backend_path(
            "/api/v1/scenarios",
            &params(&[("id", "unused")]),
            None,
        );
        assert_eq!(path, "/api/v1/scenarios");
    }

    #[test]
    fn test_unmatched_placeholder_left_literal() {
        // No captured value for :id: the placeholder goes out as-is.
        let path = render_backend_path("/api/v1/scenarios/:id/run", &[], None);
        assert_eq!(path, "/api/v1/scenarios/:id/run");
    }

    #[test]
    fn test_parameter_replaced_exactly_once() {
        // Only the first occurrence is substituted; a duplicate placeholder
        // stays literal.
        let path = render_backend_path("/a/:id/b/:id", &params(&[("id", "1")]), None);
        assert_eq!(path, "/a/1/b/:id");
    }

    #[test]
    fn test_parameters_with_query() {
        let path = render_backend_path(
            "/api/v1/graph/entities/:id/neighbors",
            &params(&[("id", "ent-33")]),
            Some("depth=2"),
        );
        assert_eq!(path, "/api/v1/graph/entities/ent-33/neighbors?depth=2");
    }
}
