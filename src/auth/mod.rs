//! Identity resolution
//!
//! The backend trusts an external identity provider; what arrives here is a
//! bearer token. Verification is HS256 against a shared secret. When auth is
//! disabled in config (local development) every request resolves to a
//! synthetic user carrying the configured dev scopes, mirroring how the rest
//! of the stack is exercised without a running IdP.

pub mod middleware;
pub mod service;

pub use middleware::auth_middleware;
pub use service::{AuthError, AuthService, AuthenticatedUser, Claims};
