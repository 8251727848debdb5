use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller context extracted from the bearer token.
/// Immutable for the lifetime of the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: String,
    pub given_name: String,
    pub family_name: String,
    pub city: Option<String>,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            given_name: claims.given_name,
            family_name: claims.family_name,
            city: claims.city,
        }
    }
}

/// JWT authentication middleware that validates tokens and extracts user context
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Extract JWT from Authorization header
    let token = extract_jwt_from_headers(request.headers()).map_err(ApiError::unauthorized)?;

    // Validate and decode JWT
    let claims = state.tokens.validate(&token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    // Convert claims to AuthUser and inject into request
    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    // Auth schemes are case-insensitive
    let (scheme, token) = auth_str.trim_start().split_once(' ').unwrap_or((auth_str.trim(), ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err("Authorization header must use Bearer token format".to_string());
    }

    let token = token.trim();
    if token.is_empty() {
        return Err("Empty JWT token".to_string());
    }
    Ok(token.to_string())
}
