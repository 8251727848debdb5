// handlers/protected/points_of_interest.rs - /api/cities/:cityId/pointsofinterest[/:id]
//
// Existence checks always run before anything is staged, so a 404 never
// leaves a half-applied change behind.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::Uri,
    Extension, Json,
};
use tracing::{info, warn};

use crate::api::dto::{
    PointOfInterestDto, PointOfInterestForCreationDto, PointOfInterestForUpdateDto, PointOfInterestPatchDocument,
};
use crate::database::models::PointOfInterest;
use crate::database::CityInfoRepository;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

pub const DELETED_MAIL_SUBJECT: &str = "Point Of Interest Deleted";

async fn ensure_city_exists(repository: &CityInfoRepository, city_id: i32) -> Result<(), ApiError> {
    if repository.city_exists(city_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found(format!("City {} was not found", city_id)))
    }
}

async fn load_point_of_interest(
    repository: &CityInfoRepository,
    city_id: i32,
    point_of_interest_id: i32,
) -> Result<PointOfInterest, ApiError> {
    ensure_city_exists(repository, city_id).await?;

    repository
        .get_point_of_interest_for_city(city_id, point_of_interest_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "Point of interest {} in city {} was not found",
                point_of_interest_id, city_id
            ))
        })
}

/// GET .../pointsofinterest - only callers whose city claim names this city may list it
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Vec<PointOfInterestDto>> {
    let Path(city_id) = path?;
    let repository = state.repository();

    if !repository.city_name_matches_city_id(user.city.as_deref(), city_id).await? {
        warn!(user = %user.user_id, city = ?user.city, city_id, "City claim does not match requested city");
        return Err(ApiError::forbidden("Your city claim does not match this city"));
    }

    ensure_city_exists(&repository, city_id).await?;

    let points = repository.get_points_of_interest_for_city(city_id).await?;
    Ok(ApiResponse::success(points.iter().map(PointOfInterestDto::from).collect()))
}

/// GET .../pointsofinterest/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> ApiResult<PointOfInterestDto> {
    let Path((city_id, point_of_interest_id)) = path?;
    let point = load_point_of_interest(&state.repository(), city_id, point_of_interest_id).await?;
    Ok(ApiResponse::success(PointOfInterestDto::from(&point)))
}

/// POST .../pointsofinterest - 201 with a Location pointing at the new point
pub async fn create(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    uri: Uri,
    payload: Result<Json<PointOfInterestForCreationDto>, JsonRejection>,
) -> ApiResult<PointOfInterestDto> {
    let Path(city_id) = path?;
    let Json(body) = payload?;
    body.validate()?;

    let mut repository = state.repository();
    ensure_city_exists(&repository, city_id).await?;

    let point = repository
        .add_point_of_interest_for_city(city_id, body.into_draft())
        .await?;
    repository.save_changes().await?;
    info!(city_id, point_of_interest_id = point.id, "Created point of interest");

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), point.id);
    Ok(ApiResponse::created(PointOfInterestDto::from(&point), &location))
}

/// PUT .../pointsofinterest/:id - full replace of name and description
pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    payload: Result<Json<PointOfInterestForUpdateDto>, JsonRejection>,
) -> ApiResult<()> {
    let Path((city_id, point_of_interest_id)) = path?;
    let Json(body) = payload?;
    body.validate()?;

    let mut repository = state.repository();
    let mut point = load_point_of_interest(&repository, city_id, point_of_interest_id).await?;

    body.apply_to(&mut point);
    repository.update_point_of_interest(&point);
    repository.save_changes().await?;
    info!(city_id, point_of_interest_id, "Updated point of interest");

    Ok(ApiResponse::no_content())
}

/// PATCH .../pointsofinterest/:id - JSON Patch applied to the update shape of the point
pub async fn patch(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    payload: Result<Json<json_patch::Patch>, JsonRejection>,
) -> ApiResult<()> {
    let Path((city_id, point_of_interest_id)) = path?;
    let Json(patch_document) = payload?;

    let mut repository = state.repository();
    let mut point = load_point_of_interest(&repository, city_id, point_of_interest_id).await?;

    let mut document = serde_json::to_value(PointOfInterestPatchDocument::from(&point))
        .map_err(|e| ApiError::internal_server_error(format!("Failed to prepare patch target: {}", e)))?;

    json_patch::patch(&mut document, &patch_document)
        .map_err(|e| ApiError::validation_error(format!("Patch could not be applied: {}", e), None))?;

    let patched: PointOfInterestForUpdateDto = serde_json::from_value::<PointOfInterestPatchDocument>(document)
        .map_err(|e| ApiError::validation_error(format!("Patched point of interest is invalid: {}", e), None))?
        .into();
    patched.validate()?;

    patched.apply_to(&mut point);
    repository.update_point_of_interest(&point);
    repository.save_changes().await?;
    info!(city_id, point_of_interest_id, "Patched point of interest");

    Ok(ApiResponse::no_content())
}

/// DELETE .../pointsofinterest/:id - removes the point and sends a notification
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> ApiResult<()> {
    let Path((city_id, point_of_interest_id)) = path?;
    let mut repository = state.repository();
    let point = load_point_of_interest(&repository, city_id, point_of_interest_id).await?;

    repository.delete_point_of_interest(&point);
    repository.save_changes().await?;
    info!(city_id, point_of_interest_id, "Deleted point of interest");

    state.mail.send(
        DELETED_MAIL_SUBJECT,
        &format!("Point of interest {} with id {} was deleted.", point.name, point.id),
    );

    Ok(ApiResponse::no_content())
}
