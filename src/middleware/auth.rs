//! # Authentication Middleware
//!
//! Bearer token validation for protected routes. Tokens are HS256 JWTs
//! minted by the IAM service; the gateway shares the signing secret and
//! validates locally, so no IAM round trip happens on the hot path.
//!
//! Validated claims land in request extensions for downstream handlers.
//! Token minting, refresh, and revocation all belong to IAM; the gateway
//! only gates.

use crate::core::error::GatewayError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// JWT claims as minted by the IAM service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub roles: Vec<String>,

    pub exp: u64,

    #[serde(default)]
    pub iat: Option<u64>,

    /// "access" or "refresh"; only access tokens pass the gate
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
}

impl Claims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Shared validator holding the decoding key
pub struct AuthValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthValidator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a bearer token and return its claims. Signature, expiry,
    /// and token type are all checked; the failure reason is logged but
    /// never sent to the client.
    pub fn validate(&self, token: &str) -> Result<Claims, GatewayError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(error = %e, "token validation failed");
            GatewayError::auth("Invalid token")
        })?;

        if let Some(token_type) = &data.claims.token_type {
            if token_type != "access" {
                return Err(GatewayError::auth("Invalid token"));
            }
        }

        Ok(data.claims)
    }
}

pub async fn authenticate(
    State(validator): State<Arc<AuthValidator>>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(header) => header,
        None => return GatewayError::auth("Authorization header required").into_response(),
    };

    let token = match parse_bearer(header) {
        Some(token) => token,
        None => {
            return GatewayError::auth("Invalid authorization header format").into_response();
        }
    };

    match validator.validate(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(error) => error.into_response(),
    }
}

fn parse_bearer(header: &str) -> Option<&str> {
    let mut parts = header.splitn(3, ' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Some(token),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    const SECRET: &str = "test-secret";

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    fn mint(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        Claims {
            user_id: "user-123".to_string(),
            username: Some("analyst".to_string()),
            roles: vec!["analyst".to_string()],
            exp: now() + 3600,
            iat: Some(now()),
            token_type: Some("access".to_string()),
        }
    }

    #[test]
    fn test_valid_token_yields_claims() {
        let validator = AuthValidator::new(SECRET);
        let token = mint(&valid_claims(), SECRET);

        let claims = validator.validate(&token).unwrap();
        assert_eq!(claims.user_id, "user-123");
        assert!(claims.has_role("analyst"));
        assert!(!claims.has_role("admin"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let validator = AuthValidator::new(SECRET);
        let token = mint(&valid_claims(), "other-secret");
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let validator = AuthValidator::new(SECRET);
        let mut claims = valid_claims();
        claims.exp = now() - 3600;
        let token = mint(&claims, SECRET);
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_refresh_token_rejected_at_gate() {
        let validator = AuthValidator::new(SECRET);
        let mut claims = valid_claims();
        claims.token_type = Some("refresh".to_string());
        let token = mint(&claims, SECRET);
        assert!(validator.validate(&token).is_err());
    }

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc"), None);
        assert_eq!(parse_bearer("Basic dXNlcg=="), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer a b"), None);
    }
}
