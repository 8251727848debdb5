// handlers/public/authentication.rs - POST /api/authentication/authenticate

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

use crate::api::dto::AuthenticationRequestBody;
use crate::error::ApiError;
use crate::state::AppState;

/// Exchanges demo credentials for a signed bearer token.
///
/// The token is returned as the plain-text body. Rejected credentials are a
/// 401 without a body token; a missing signing key surfaces as a 500.
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<AuthenticationRequestBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Unreadable authentication request: {}", rejection.body_text());
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    let user = state
        .users
        .validate_credentials(body.user_name.as_deref(), body.password.as_deref())
        .ok_or_else(|| {
            warn!("Credential check failed");
            ApiError::unauthorized("Invalid credentials")
        })?;

    let token = state.tokens.issue(&user)?;
    info!(user_id = user.user_id, city = %user.city, "Issued bearer token");

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], token))
}
