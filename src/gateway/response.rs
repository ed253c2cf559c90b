//! API response envelope and error codes
//!
//! - `ApiResponse<T>`: Unified response wrapper
//! - `error_codes`: Standard error code constants
//! - `ApiError`: HTTP error carrying a status and an envelope code

use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::AuthError;
use crate::ledger::LedgerError;
use crate::oracle::OracleError;
use crate::otp::{MfaError, OtpError};
use crate::payouts::PayoutError;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// All API responses follow this structure:
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or null (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response code: 0 for success, non-zero for errors
    #[schema(example = 0)]
    pub code: i32,
    /// Response message
    #[schema(example = "ok")]
    pub msg: String,
    /// Response data (only present when code == 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }

    /// Create error response
    pub fn error(code: i32, msg: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Handler result: a status plus the success envelope, or an [`ApiError`].
pub type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::OK, Json(ApiResponse::success(data))))
}

pub fn created<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::success(data))))
}

pub fn accepted<T>(data: T) -> ApiResult<T> {
    Ok((StatusCode::ACCEPTED, Json(ApiResponse::success(data))))
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    // Success
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;
    pub const INSUFFICIENT_BALANCE: i32 = 1002;
    pub const INSUFFICIENT_POSITION: i32 = 1003;
    pub const UNSUPPORTED_CURRENCY: i32 = 1004;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;
    pub const AUTH_FAILED: i32 = 2002;
    pub const MISSING_SCOPE: i32 = 2003;
    pub const MFA_REQUIRED: i32 = 2101;
    pub const MFA_EXPIRED: i32 = 2102;

    // Resource errors (4xxx)
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4009;
    pub const RATE_LIMITED: i32 = 4291;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
    pub const UPSTREAM_FAILED: i32 = 5002;
}

// ============================================================================
// ApiError
// ============================================================================

/// Error that renders as `(status, {code, msg})`.
///
/// Engine errors convert into this at the handler boundary; raw database
/// messages are never exposed to clients.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "internal error",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ApiResponse::<()>::error(self.code, self.msg)),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        use error_codes::*;
        match err {
            LedgerError::Db(e) => {
                tracing::error!("ledger database error: {e}");
                Self::internal()
            }
            LedgerError::AccountNotFound => {
                Self::new(StatusCode::NOT_FOUND, NOT_FOUND, err.to_string())
            }
            LedgerError::InvalidAssociation => {
                Self::new(StatusCode::BAD_REQUEST, INVALID_PARAMETER, err.to_string())
            }
            LedgerError::Conflict => Self::new(StatusCode::CONFLICT, CONFLICT, err.to_string()),
            LedgerError::UnsupportedCurrency(_) => {
                Self::new(StatusCode::BAD_REQUEST, UNSUPPORTED_CURRENCY, err.to_string())
            }
            LedgerError::InsufficientBalance => {
                Self::new(StatusCode::BAD_REQUEST, INSUFFICIENT_BALANCE, err.to_string())
            }
            LedgerError::InsufficientPosition => {
                Self::new(StatusCode::BAD_REQUEST, INSUFFICIENT_POSITION, err.to_string())
            }
            LedgerError::InvalidInput(_) => {
                Self::new(StatusCode::BAD_REQUEST, INVALID_PARAMETER, err.to_string())
            }
        }
    }
}

impl From<PayoutError> for ApiError {
    fn from(err: PayoutError) -> Self {
        use error_codes::*;
        match err {
            PayoutError::Db(e) => {
                tracing::error!("payout database error: {e}");
                Self::internal()
            }
            PayoutError::InvalidIban
            | PayoutError::InvalidBic
            | PayoutError::HolderMismatch
            | PayoutError::CurrencyMismatch
            | PayoutError::MethodInUse
            | PayoutError::InvalidInput(_) => {
                Self::new(StatusCode::BAD_REQUEST, INVALID_PARAMETER, err.to_string())
            }
            PayoutError::IbanInUse => Self::new(StatusCode::CONFLICT, CONFLICT, err.to_string()),
            PayoutError::MethodNotFound | PayoutError::AccountNotFound => {
                Self::new(StatusCode::NOT_FOUND, NOT_FOUND, err.to_string())
            }
            PayoutError::InsufficientBalance => {
                Self::new(StatusCode::BAD_REQUEST, INSUFFICIENT_BALANCE, err.to_string())
            }
        }
    }
}

impl From<OtpError> for ApiError {
    fn from(err: OtpError) -> Self {
        use error_codes::*;
        match err {
            OtpError::Db(e) => {
                tracing::error!("otp database error: {e}");
                Self::internal()
            }
            OtpError::NotConfigured => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                SERVICE_UNAVAILABLE,
                err.to_string(),
            ),
            OtpError::UserNotFound | OtpError::ChallengeNotFound => {
                Self::new(StatusCode::NOT_FOUND, NOT_FOUND, err.to_string())
            }
            OtpError::ChannelUnavailable | OtpError::MissingDestination(_) => {
                Self::new(StatusCode::BAD_REQUEST, INVALID_PARAMETER, err.to_string())
            }
            OtpError::Delivery(_) => {
                Self::new(StatusCode::BAD_GATEWAY, UPSTREAM_FAILED, err.to_string())
            }
            OtpError::AlreadyVerified => {
                Self::new(StatusCode::CONFLICT, CONFLICT, err.to_string())
            }
            OtpError::Expired | OtpError::InvalidCode => {
                Self::new(StatusCode::BAD_REQUEST, INVALID_PARAMETER, err.to_string())
            }
            OtpError::TooManyAttempts => {
                Self::new(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED, err.to_string())
            }
        }
    }
}

impl From<MfaError> for ApiError {
    fn from(err: MfaError) -> Self {
        use error_codes::*;
        match err {
            MfaError::Db(e) => {
                tracing::error!("mfa database error: {e}");
                Self::internal()
            }
            MfaError::Required => Self::new(StatusCode::FORBIDDEN, MFA_REQUIRED, err.to_string()),
            MfaError::Expired => Self::new(StatusCode::FORBIDDEN, MFA_EXPIRED, err.to_string()),
        }
    }
}

impl From<OracleError> for ApiError {
    fn from(err: OracleError) -> Self {
        use error_codes::*;
        match err {
            OracleError::UnknownAsset => {
                Self::new(StatusCode::NOT_FOUND, NOT_FOUND, err.to_string())
            }
            OracleError::Upstream(e) => {
                tracing::warn!("market data upstream error: {e}");
                Self::new(
                    StatusCode::BAD_GATEWAY,
                    UPSTREAM_FAILED,
                    "market data unavailable",
                )
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        use error_codes::*;
        match err {
            AuthError::MissingToken => {
                Self::new(StatusCode::UNAUTHORIZED, MISSING_AUTH, err.to_string())
            }
            AuthError::InvalidToken | AuthError::MissingSubject => {
                Self::new(StatusCode::UNAUTHORIZED, AUTH_FAILED, err.to_string())
            }
            AuthError::MissingScope(_) => {
                Self::new(StatusCode::FORBIDDEN, MISSING_SCOPE, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_has_code_zero() {
        let resp = ApiResponse::success(42);
        assert_eq!(resp.code, 0);
        assert_eq!(resp.msg, "ok");
        assert_eq!(resp.data, Some(42));
    }

    #[test]
    fn error_envelope_omits_data_in_json() {
        let resp = ApiResponse::<()>::error(error_codes::NOT_FOUND, "missing");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("data"));
        assert!(json.contains("4001"));
    }

    #[test]
    fn db_errors_do_not_leak_details() {
        let err: ApiError = LedgerError::Db(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.msg, "internal error");
    }

    #[test]
    fn mfa_gate_maps_to_forbidden() {
        let required: ApiError = MfaError::Required.into();
        assert_eq!(required.status, StatusCode::FORBIDDEN);
        assert_eq!(required.code, error_codes::MFA_REQUIRED);

        let expired: ApiError = MfaError::Expired.into();
        assert_eq!(expired.code, error_codes::MFA_EXPIRED);
    }

    #[test]
    fn attempt_cap_maps_to_429() {
        let err: ApiError = OtpError::TooManyAttempts.into();
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(err.code, error_codes::RATE_LIMITED);
    }
}
