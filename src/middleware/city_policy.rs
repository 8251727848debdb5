use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::CityPolicy;
use crate::error::ApiError;
use crate::state::AppState;

use super::auth::AuthUser;

/// Route layer enforcing the configured `CityPolicy`. Must run after `jwt_auth_middleware`.
pub async fn require_city_policy(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| ApiError::unauthorized("JWT authentication required before policy evaluation"))?;

    if !state.city_policy.allows(auth_user) {
        tracing::warn!(
            user = %auth_user.user_id,
            city = ?auth_user.city,
            policy = CityPolicy::NAME,
            "Caller rejected by city policy"
        );
        return Err(ApiError::forbidden(format!(
            "Policy {} requires city {}",
            CityPolicy::NAME,
            state.city_policy.required_city
        )));
    }

    Ok(next.run(request).await)
}
