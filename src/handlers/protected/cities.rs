// handlers/protected/cities.rs - GET /api/cities and GET /api/cities/:cityId

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::HeaderName,
};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::api::dto::{CityResponse, CityWithoutPointsOfInterestDto};
use crate::database::{CityQuery, PageRequest};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub const PAGINATION_HEADER: HeaderName = HeaderName::from_static("x-pagination");

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitiesQuery {
    pub name: Option<String>,
    pub search_query: Option<String>,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityQueryParams {
    #[serde(default, deserialize_with = "bool_ignoring_case")]
    pub include_points_of_interest: bool,
}

/// Accepts `true`/`false` in any letter case; an empty value means false
fn bool_ignoring_case<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim() {
        "" => Ok(false),
        v if v.eq_ignore_ascii_case("true") => Ok(true),
        v if v.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "includePointsOfInterest must be true or false, got '{}'",
            other
        ))),
    }
}

/// GET /api/cities - filtered, paginated listing without nested points
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<CitiesQuery>, QueryRejection>,
) -> ApiResult<Vec<CityWithoutPointsOfInterestDto>> {
    let Query(params) = params?;
    let pagination = &state.config.pagination;

    let page = PageRequest::new(
        params.page_number.unwrap_or(1),
        params.page_size.unwrap_or(pagination.default_page_size),
        pagination.max_page_size,
    )?;
    let query = CityQuery::new(params.name.as_deref(), params.search_query.as_deref(), page);

    let (cities, metadata) = state.repository().get_cities_page(&query).await?;
    debug!(returned = cities.len(), total = metadata.total_count, "Listed cities");

    let header = serde_json::to_string(&metadata)
        .map_err(|e| ApiError::internal_server_error(format!("Failed to encode pagination metadata: {}", e)))?;

    Ok(ApiResponse::success(cities.iter().map(CityWithoutPointsOfInterestDto::from).collect())
        .with_header(PAGINATION_HEADER, &header))
}

/// GET /api/cities/:cityId - single city, nested points only when asked for
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    params: Result<Query<CityQueryParams>, QueryRejection>,
) -> ApiResult<CityResponse> {
    let Path(city_id) = path?;
    let Query(params) = params?;

    let city = state
        .repository()
        .get_city(city_id, params.include_points_of_interest)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("City {} was not found", city_id)))?;

    Ok(ApiResponse::success(CityResponse::from_city(
        &city,
        params.include_points_of_interest,
    )))
}
