use auth::AuthRejection;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Middleware that runs the auth gate and adds the principal to request extensions
///
/// Rejections are answered with 401 and a generic message; the precise reason
/// only reaches the logs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = state
        .authenticator
        .gate()
        .authenticate(req.headers())
        .map_err(|rejection| {
            match &rejection {
                AuthRejection::InvalidOrExpiredToken(reason) => tracing::warn!(
                    method = %req.method(),
                    uri = %req.uri(),
                    reason = %reason,
                    "Token verification failed"
                ),
                _ => tracing::debug!(
                    method = %req.method(),
                    uri = %req.uri(),
                    rejection = %rejection,
                    "Request rejected by auth gate"
                ),
            }
            ApiError::from(rejection)
        })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
