use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::Database;
use crate::oracle::PriceOracle;
use crate::otp::{HttpOtpDelivery, OtpDelivery, OtpEngine};

/// Shared gateway state, built once at startup.
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub auth: AuthService,
    pub otp: OtpEngine,
    pub oracle: PriceOracle,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        let auth = AuthService::new(config.auth.clone());

        let delivery: Option<Arc<dyn OtpDelivery>> =
            config.otp.delivery_base_url.as_deref().map(|base_url| {
                Arc::new(HttpOtpDelivery::new(
                    base_url,
                    Duration::from_secs(config.otp.delivery_timeout_secs),
                )) as Arc<dyn OtpDelivery>
            });

        let otp = OtpEngine::new(config.otp.clone(), delivery);

        let oracle = PriceOracle::from_config(&config.oracle);

        Self {
            config,
            db,
            auth,
            otp,
            oracle,
        }
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }
}
