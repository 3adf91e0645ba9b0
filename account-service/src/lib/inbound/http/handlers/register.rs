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
use crate::account::models::RegisterCommand;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<CredentialsRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<SessionResponseData>, ApiError> {
    let Json(body) = body?;
    let (email, password) = body.into_parts()?;

    let email = EmailAddress::new(email).map_err(AccountError::from)?;

    state
        .account_service
        .register(RegisterCommand::new(email, password))
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::CREATED,
                SessionResponseData::new("User registered successfully!", session),
            )
        })
}
