//! OTP delivery collaborator
//!
//! The backend never sends email or SMS itself; codes are handed to a
//! dedicated delivery microservice over HTTP. The payload carries the
//! channel-specific destination as a tagged enum so that the required-field
//! contract (email address for EMAIL, phone number for SMS) is checked by
//! the type system rather than by inspecting an open-ended map.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("OTP service unreachable")]
    Unreachable(#[source] reqwest::Error),
    #[error("OTP service rejected the request: {0}")]
    Rejected(String),
}

/// Channel destination. Serializes inline into the payload as the field the
/// delivery service expects (`email` or `phone_number`).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum DispatchTarget {
    Email { email: String },
    Sms { phone_number: String },
}

impl DispatchTarget {
    pub fn channel_code(&self) -> &'static str {
        match self {
            Self::Email { .. } => "EMAIL",
            Self::Sms { .. } => "SMS",
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            Self::Email { email } => email,
            Self::Sms { phone_number } => phone_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DispatchPayload {
    pub user_id: Uuid,
    pub channel: &'static str,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub context: String,
    #[serde(flatten)]
    pub target: DispatchTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl DispatchPayload {
    pub fn new(
        user_id: Uuid,
        target: DispatchTarget,
        code: String,
        expires_at: DateTime<Utc>,
        context: String,
        metadata: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Self {
        Self {
            user_id,
            channel: target.channel_code(),
            code,
            expires_at,
            context,
            target,
            metadata,
        }
    }
}

#[async_trait]
pub trait OtpDelivery: Send + Sync {
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<(), DeliveryError>;
}

/// HTTP client for the delivery microservice. The service answers 202 on
/// accepted dispatches; anything else is a rejection.
pub struct HttpOtpDelivery {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOtpDelivery {
    /// Built once at startup.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build OTP delivery HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl OtpDelivery for HttpOtpDelivery {
    async fn dispatch(&self, payload: &DispatchPayload) -> Result<(), DeliveryError> {
        let url = format!("{}/otp/send", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(DeliveryError::Unreachable)?;

        if response.status() != reqwest::StatusCode::ACCEPTED {
            let detail = response
                .text()
                .await
                .ok()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "OTP service rejected the request".to_string());
            return Err(DeliveryError::Rejected(detail));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_payload_carries_email_field() {
        let payload = DispatchPayload::new(
            Uuid::nil(),
            DispatchTarget::Email {
                email: "mario@example.com".to_string(),
            },
            "123456".to_string(),
            Utc::now(),
            "default".to_string(),
            None,
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["channel"], "EMAIL");
        assert_eq!(json["email"], "mario@example.com");
        assert!(json.get("phone_number").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn sms_payload_carries_phone_number_field() {
        let payload = DispatchPayload::new(
            Uuid::nil(),
            DispatchTarget::Sms {
                phone_number: "+393331112223".to_string(),
            },
            "654321".to_string(),
            Utc::now(),
            "payout".to_string(),
            None,
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["channel"], "SMS");
        assert_eq!(json["phone_number"], "+393331112223");
        assert!(json.get("email").is_none());
    }

    #[test]
    fn metadata_serializes_when_present() {
        let mut meta = serde_json::Map::new();
        meta.insert("ip".to_string(), serde_json::json!("127.0.0.1"));
        let payload = DispatchPayload::new(
            Uuid::nil(),
            DispatchTarget::Email {
                email: "a@b.c".to_string(),
            },
            "000000".to_string(),
            Utc::now(),
            "default".to_string(),
            Some(meta),
        );
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["metadata"]["ip"], "127.0.0.1");
    }
}
