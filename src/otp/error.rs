use thiserror::Error;

use super::delivery::DeliveryError;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("OTP delivery service is not configured")]
    NotConfigured,
    #[error("User not found")]
    UserNotFound,
    #[error("OTP channel unavailable or disabled")]
    ChannelUnavailable,
    #[error("No destination available for channel {0}")]
    MissingDestination(String),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error("OTP challenge not found")]
    ChallengeNotFound,
    #[error("OTP challenge was already verified")]
    AlreadyVerified,
    #[error("OTP code expired")]
    Expired,
    #[error("Maximum number of attempts reached")]
    TooManyAttempts,
    #[error("Invalid OTP code")]
    InvalidCode,
}
