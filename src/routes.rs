use axum::{
    http::{header, HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, require_city_policy};
use crate::state::AppState;
use crate::types::ApiVersion;

/// Unversioned `/api/...` paths serve v1
pub const UNVERSIONED_PREFIX: &str = "/api";

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(api_routes(&state, UNVERSIONED_PREFIX, ApiVersion::V1));

    for version in ApiVersion::ALL {
        router = router.merge(api_routes(&state, &version.prefix(), version));
    }

    router
        // Global middleware
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Every route of one API version mounted under `prefix`
fn api_routes(state: &AppState, prefix: &str, version: ApiVersion) -> Router<AppState> {
    let authentication = Router::new().route(
        &format!("{}/authentication/authenticate", prefix),
        post(public::authenticate),
    );

    let cities = Router::new()
        .route(&format!("{}/cities", prefix), get(protected::cities_list))
        .route(&format!("{}/cities/:city_id", prefix), get(protected::city_get));

    let mut points_of_interest = Router::new()
        .route(
            &format!("{}/cities/:city_id/pointsofinterest", prefix),
            get(protected::points_of_interest_list).post(protected::point_of_interest_create),
        )
        .route(
            &format!("{}/cities/:city_id/pointsofinterest/:point_of_interest_id", prefix),
            get(protected::point_of_interest_get)
                .put(protected::point_of_interest_update)
                .patch(protected::point_of_interest_patch)
                .delete(protected::point_of_interest_delete),
        );

    if version.requires_city_policy() {
        points_of_interest =
            points_of_interest.route_layer(middleware::from_fn_with_state(state.clone(), require_city_policy));
    }

    // Added last so token validation runs before the city policy
    let protected = cities
        .merge(points_of_interest)
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    authentication.merge(protected)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::LOCATION, HeaderName::from_static("x-pagination")])
}
