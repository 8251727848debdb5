// handlers/public/system.rs - GET / and GET /health

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "City Info API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Cities and their points of interest",
        "endpoints": {
            "authentication": "/api/authentication/authenticate (public)",
            "cities": "/api[/v1|/v2]/cities[/:cityId] (protected)",
            "points_of_interest": "/api[/v1|/v2]/cities/:cityId/pointsofinterest[/:id] (protected, v2 requires the city policy)",
            "health": "/health (public)"
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}
