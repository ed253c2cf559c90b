use serde::{Deserialize, Serialize};
use std::fs;

/// Application configuration loaded once at startup from `config/<env>.yaml`.
///
/// The loaded struct is handed to every component explicitly; there is no
/// ambient settings singleton.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub postgres_url: String,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// When false, requests without a bearer token resolve to a synthetic
    /// dev user holding `dev_scopes`.
    pub enabled: bool,
    pub jwt_secret: String,
    pub dev_scopes: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            jwt_secret: "dev-only-secret-change-me".to_string(),
            dev_scopes: vec![
                "accounts:read".to_string(),
                "transactions:read".to_string(),
                "transactions:write".to_string(),
                "crypto:read".to_string(),
                "payouts:read".to_string(),
                "payouts:write".to_string(),
            ],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OtpConfig {
    /// Base URL of the OTP delivery microservice. `None` means sending is
    /// not configured and `POST /otp/send` fails fast.
    pub delivery_base_url: Option<String>,
    pub delivery_timeout_secs: u64,
    pub code_ttl_seconds: i64,
    pub max_attempts: i32,
    pub mfa_session_ttl_seconds: i64,
    /// Additional freshness window enforced by the step-up gate, on top of
    /// the MFA session's own expiry.
    pub mfa_max_age_seconds: i64,
    pub code_secret: String,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            delivery_base_url: None,
            delivery_timeout_secs: 5,
            code_ttl_seconds: 60,
            max_attempts: 5,
            mfa_session_ttl_seconds: 300,
            mfa_max_age_seconds: 300,
            code_secret: "dev-otp-secret-change-me".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub cache_ttl_seconds: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rest.coincap.io/v3".to_string(),
            api_key: None,
            timeout_secs: 15,
            cache_ttl_seconds: 3 * 60 * 60,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml_with_defaults() {
        let yaml = r#"
log_level: "info"
log_dir: "logs"
log_file: "test.log"
use_json: false
rotation: "never"
gateway:
  host: "127.0.0.1"
  port: 8080
postgres_url: "postgresql://localhost/fintera"
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.gateway.port, 8080);
        assert!(!cfg.auth.enabled);
        assert_eq!(cfg.otp.max_attempts, 5);
        assert_eq!(cfg.otp.code_ttl_seconds, 60);
        assert!(cfg.otp.delivery_base_url.is_none());
        assert_eq!(cfg.oracle.cache_ttl_seconds, 10800);
    }

    #[test]
    fn otp_section_overrides_defaults() {
        let yaml = r#"
log_level: "debug"
log_dir: "logs"
log_file: "test.log"
use_json: true
rotation: "daily"
gateway:
  host: "0.0.0.0"
  port: 9000
postgres_url: "postgresql://localhost/fintera"
otp:
  delivery_base_url: "http://otp:8100"
  delivery_timeout_secs: 3
  code_ttl_seconds: 120
  max_attempts: 3
  mfa_session_ttl_seconds: 600
  mfa_max_age_seconds: 120
  code_secret: "s3cret"
"#;
        let cfg: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            cfg.otp.delivery_base_url.as_deref(),
            Some("http://otp:8100")
        );
        assert_eq!(cfg.otp.code_ttl_seconds, 120);
        assert_eq!(cfg.otp.max_attempts, 3);
        assert_eq!(cfg.otp.mfa_max_age_seconds, 120);
    }
}
