use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A configured delivery channel (seeded: EMAIL, SMS).
#[derive(Debug, Clone, FromRow)]
pub struct OtpChannel {
    pub id: Uuid,
    pub code: String,
}

/// Challenge lifecycle: PENDING is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeStatus {
    Pending,
    Verified,
    Expired,
}

impl ChallengeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Expired => "EXPIRED",
        }
    }
}

/// Row shape loaded (and locked) by verify.
#[derive(Debug, FromRow)]
pub struct OtpChallenge {
    pub id: Uuid,
    pub user_id: Uuid,
    pub channel_id: Uuid,
    pub context: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub attempts: i32,
    pub status: String,
}

/// Outcome recorded in the append-only `otp_audits` table.
///
/// `Success` on a send means delivery succeeded, not that the code was later
/// verified; on a verify it means the code matched.
#[derive(Debug, Clone, Copy)]
pub enum AuditOutcome {
    Success,
    Failed,
    Expired,
}

impl AuditOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Expired => "expired",
        }
    }
}
