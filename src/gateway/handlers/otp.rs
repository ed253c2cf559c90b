//! OTP handlers (send a challenge, verify a code)

use std::sync::Arc;

use axum::{Extension, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::otp::SendRequest;

use super::super::response::{ApiResult, accepted, ok};
use super::super::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct OtpSendRequest {
    /// Channel code (e.g. EMAIL, SMS); defaults to the user's preference
    pub channel_code: Option<String>,
    /// Alternative destination (email address or phone number)
    pub destination: Option<String>,
    /// Step-up context the verification will unlock; defaults to "default"
    pub context: Option<String>,
    /// Optional metadata forwarded to the delivery service
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpSendData {
    /// Dispatch outcome, always "sent" on success
    pub status: &'static str,
    pub challenge_id: Uuid,
    pub channel_code: String,
    pub expires_at: DateTime<Utc>,
}

/// Send a one-time code
///
/// Generates a 6-digit code, dispatches it through the delivery service
/// and records the challenge. The raw code never appears in the response.
#[utoipa::path(
    post,
    path = "/otp/send",
    request_body = OtpSendRequest,
    responses(
        (status = 202, description = "Code dispatched", body = OtpSendData),
        (status = 400, description = "Channel unavailable or destination missing"),
        (status = 404, description = "User profile not found"),
        (status = 502, description = "Delivery service rejected the dispatch"),
        (status = 503, description = "OTP delivery not configured")
    ),
    security(("bearer_auth" = [])),
    tag = "OTP"
)]
pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    axum::Json(req): axum::Json<OtpSendRequest>,
) -> ApiResult<OtpSendData> {
    user.require_scope("transactions:write")?;

    let outcome = state
        .otp
        .send(
            state.pool(),
            user.user_id,
            SendRequest {
                channel_code: req.channel_code,
                destination: req.destination,
                context: req.context,
                metadata: req.metadata,
            },
        )
        .await?;

    accepted(OtpSendData {
        status: "sent",
        challenge_id: outcome.challenge_id,
        channel_code: outcome.channel_code,
        expires_at: outcome.expires_at,
    })
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OtpVerifyRequest {
    pub challenge_id: Uuid,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpVerifyData {
    /// Always "verified" on success
    pub status: &'static str,
    pub verified_at: DateTime<Utc>,
    /// End of the MFA session this verification opened
    pub expires_at: DateTime<Utc>,
}

/// Verify a one-time code
///
/// On success the caller holds a fresh MFA session for the challenge's
/// context, unlocking step-up-gated operations.
#[utoipa::path(
    post,
    path = "/otp/verify",
    request_body = OtpVerifyRequest,
    responses(
        (status = 200, description = "Code verified, MFA session opened", body = OtpVerifyData),
        (status = 400, description = "Wrong code or expired challenge"),
        (status = 404, description = "Challenge not found"),
        (status = 409, description = "Challenge already verified"),
        (status = 429, description = "Attempt limit reached")
    ),
    security(("bearer_auth" = [])),
    tag = "OTP"
)]
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    axum::Json(req): axum::Json<OtpVerifyRequest>,
) -> ApiResult<OtpVerifyData> {
    user.require_scope("transactions:write")?;

    let outcome = state
        .otp
        .verify(state.pool(), user.user_id, req.challenge_id, &req.code)
        .await?;

    ok(OtpVerifyData {
        status: "verified",
        verified_at: outcome.verified_at,
        expires_at: outcome.session_expires_at,
    })
}
