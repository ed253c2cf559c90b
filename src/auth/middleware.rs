use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::gateway::{
    response::{ApiResponse, error_codes},
    state::AppState,
};

/// Resolves the caller and injects [`AuthenticatedUser`] as a request
/// extension. With auth disabled, requests without a token fall back to the
/// synthetic dev user.
///
/// [`AuthenticatedUser`]: crate::auth::AuthenticatedUser
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, Json<ApiResponse<()>>)> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let user = match bearer {
        Some(token) => state.auth.resolve(token).map_err(|e| {
            tracing::debug!("token rejected: {e}");
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    error_codes::AUTH_FAILED,
                    "Invalid or expired token",
                )),
            )
        })?,
        None if !state.auth.enabled() => state.auth.dev_user(),
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<()>::error(
                    error_codes::MISSING_AUTH,
                    "Missing Authorization header",
                )),
            ));
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
