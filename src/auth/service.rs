use std::collections::HashSet;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthConfig;

/// User id assumed when auth is disabled. Matches the seeded demo user.
pub const DEV_USER_ID: &str = "aaaaaaaa-1111-2222-3333-444444444444";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing access token")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Token is missing the subject claim")]
    MissingSubject,
    #[error("Scope '{0}' absent or insufficient")]
    MissingScope(String),
}

/// Token claims. `scope` is the space-separated OAuth convention.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Resolved caller identity, injected into handlers as an Extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub subject: String,
    pub scopes: HashSet<String>,
    pub email: Option<String>,
    /// Full-name claims used by the payout KYC cross-check.
    pub kyc_name: Option<String>,
}

impl AuthenticatedUser {
    /// Check a required scope; handlers call this before touching the ledger.
    pub fn require_scope(&self, required: &str) -> Result<(), AuthError> {
        if self.scopes.contains(required) {
            Ok(())
        } else {
            Err(AuthError::MissingScope(required.to_string()))
        }
    }
}

pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Synthetic caller used when auth is disabled.
    pub fn dev_user(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            // The constant parses by construction.
            user_id: Uuid::parse_str(DEV_USER_ID).expect("dev user id is a valid uuid"),
            subject: DEV_USER_ID.to_string(),
            scopes: self.config.dev_scopes.iter().cloned().collect(),
            email: None,
            kyc_name: None,
        }
    }

    /// Verify a bearer token and resolve the caller.
    pub fn resolve(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = token_data.claims;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::MissingSubject)?;
        let scopes: HashSet<String> = claims
            .scope
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let kyc_name = claims.name.clone().or_else(|| claims.family_name.clone());

        Ok(AuthenticatedUser {
            user_id,
            subject: claims.sub,
            scopes,
            email: claims.email,
            kyc_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn service(enabled: bool) -> AuthService {
        AuthService::new(AuthConfig {
            enabled,
            jwt_secret: "test-secret".to_string(),
            dev_scopes: vec!["accounts:read".to_string()],
        })
    }

    fn issue(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> Claims {
        Claims {
            sub: "aaaaaaaa-1111-2222-3333-444444444444".to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            scope: "transactions:write payouts:write".to_string(),
            email: Some("mario@example.com".to_string()),
            name: Some("Mario Rossi".to_string()),
            family_name: None,
        }
    }

    #[test]
    fn resolves_scopes_and_kyc_name() {
        let svc = service(true);
        let token = issue(&valid_claims(), "test-secret");
        let user = svc.resolve(&token).unwrap();
        assert!(user.scopes.contains("transactions:write"));
        assert!(user.scopes.contains("payouts:write"));
        assert_eq!(user.kyc_name.as_deref(), Some("Mario Rossi"));
        assert!(user.require_scope("payouts:write").is_ok());
        assert!(matches!(
            user.require_scope("admin:write"),
            Err(AuthError::MissingScope(_))
        ));
    }

    #[test]
    fn rejects_wrong_secret() {
        let svc = service(true);
        let token = issue(&valid_claims(), "other-secret");
        assert!(matches!(svc.resolve(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn rejects_non_uuid_subject() {
        let svc = service(true);
        let mut claims = valid_claims();
        claims.sub = "not-a-uuid".to_string();
        let token = issue(&claims, "test-secret");
        assert!(matches!(svc.resolve(&token), Err(AuthError::MissingSubject)));
    }

    #[test]
    fn dev_user_carries_configured_scopes() {
        let svc = service(false);
        let user = svc.dev_user();
        assert!(user.scopes.contains("accounts:read"));
        assert_eq!(user.subject, DEV_USER_ID);
    }
}
