//! One-time-password step-up authentication.
//!
//! Flow: `POST /otp/send` dispatches a short-lived 6-digit code through an
//! external delivery service and records the hashed challenge; `POST
//! /otp/verify` consumes the challenge under a row lock and, on success,
//! opens an MFA session for the challenge's context. Sensitive write paths
//! (payouts) gate on that session via [`mfa::require_recent_mfa`].

pub mod delivery;
pub mod engine;
pub mod error;
pub mod mfa;
pub mod models;

pub use delivery::{DispatchPayload, DispatchTarget, HttpOtpDelivery, OtpDelivery};
pub use engine::{OtpEngine, SendOutcome, SendRequest, VerifyOutcome};
pub use error::OtpError;
pub use mfa::{MfaError, require_recent_mfa};
