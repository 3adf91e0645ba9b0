use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::ApiError;
use super::ApiSuccess;
use super::CredentialsRequestBody;
use super::SessionResponseData;
use crate::account::errors::AccountError;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let (email, password) = body.into_parts()?;

    // A malformed email cannot belong to an account
    let email = EmailAddress::new(email).map_err(|_| AccountError::InvalidCredentials)?;

    state
        .account_service
        .login(LoginCommand::new(email, password))
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::OK,
                SessionResponseData::new("Login successful!", session),
            )
        })
}
