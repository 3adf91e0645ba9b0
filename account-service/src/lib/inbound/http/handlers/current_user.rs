use auth::Principal;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiSuccess;

/// Identity of the caller, as established by the auth middleware.
pub async fn current_user(Extension(principal): Extension<Principal>) -> ApiSuccess<Principal> {
    ApiSuccess::new(StatusCode::OK, principal)
}
