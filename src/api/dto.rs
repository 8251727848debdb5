use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::database::models::{City, NewPointOfInterest, PointOfInterest};
use crate::error::ApiError;

pub const MAX_DESCRIPTION_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWithoutPointsOfInterestDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub number_of_points_of_interest: usize,
    pub points_of_interest: Vec<PointOfInterestDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Body of GET /api/cities/{id}; the nested points only appear when requested
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CityResponse {
    WithPointsOfInterest(CityDto),
    WithoutPointsOfInterest(CityWithoutPointsOfInterestDto),
}

impl CityResponse {
    pub fn from_city(city: &City, include_points_of_interest: bool) -> Self {
        if include_points_of_interest {
            CityResponse::WithPointsOfInterest(CityDto::from(city))
        } else {
            CityResponse::WithoutPointsOfInterest(CityWithoutPointsOfInterestDto::from(city))
        }
    }
}

impl From<&City> for CityWithoutPointsOfInterestDto {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
        }
    }
}

impl From<&City> for CityDto {
    fn from(city: &City) -> Self {
        Self {
            id: city.id,
            name: city.name.clone(),
            description: city.description.clone(),
            number_of_points_of_interest: city.points_of_interest.len(),
            points_of_interest: city.points_of_interest.iter().map(PointOfInterestDto::from).collect(),
        }
    }
}

impl From<&PointOfInterest> for PointOfInterestDto {
    fn from(point: &PointOfInterest) -> Self {
        Self {
            id: point.id,
            name: point.name.clone(),
            description: point.description.clone(),
        }
    }
}

/// Body of POST .../pointsofinterest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForCreationDto {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// Body of PUT on .../pointsofinterest/{id}; extra members such as `id` are ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterestForUpdateDto {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

/// Target document of PATCH on .../pointsofinterest/{id}. A patch that adds
/// any member besides name and description makes it fail to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PointOfInterestPatchDocument {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
}

impl From<&PointOfInterest> for PointOfInterestPatchDocument {
    fn from(point: &PointOfInterest) -> Self {
        Self {
            name: point.name.clone(),
            description: point.description.clone(),
        }
    }
}

impl From<PointOfInterestPatchDocument> for PointOfInterestForUpdateDto {
    fn from(document: PointOfInterestPatchDocument) -> Self {
        Self {
            name: document.name,
            description: document.description,
        }
    }
}

impl PointOfInterestForCreationDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_point_fields(&self.name, self.description.as_deref())
    }

    pub fn into_draft(self) -> NewPointOfInterest {
        NewPointOfInterest {
            name: self.name.trim().to_string(),
            description: self.description,
        }
    }
}

impl PointOfInterestForUpdateDto {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_point_fields(&self.name, self.description.as_deref())
    }

    /// Overwrites name and description on the entity
    pub fn apply_to(&self, point: &mut PointOfInterest) {
        point.name = self.name.trim().to_string();
        point.description = self.description.clone();
    }
}

fn validate_point_fields(name: &str, description: Option<&str>) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if name.trim().is_empty() {
        field_errors.insert("name".to_string(), "You should provide a name value.".to_string());
    }
    if description.map_or(false, |d| d.chars().count() > MAX_DESCRIPTION_LENGTH) {
        field_errors.insert(
            "description".to_string(),
            format!("Description must be at most {} characters.", MAX_DESCRIPTION_LENGTH),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("One or more validation errors occurred.", Some(field_errors)))
    }
}

/// Body of POST /api/authentication/authenticate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationRequestBody {
    #[serde(alias = "username", alias = "user_name")]
    pub user_name: Option<String>,
    pub password: Option<String>,
}
