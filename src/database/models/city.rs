use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::point_of_interest::PointOfInterest;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Empty unless the city was loaded with its points of interest
    #[sqlx(skip)]
    #[serde(default)]
    pub points_of_interest: Vec<PointOfInterest>,
}

impl City {
    pub fn new(id: i32, name: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.map(str::to_string),
            points_of_interest: Vec::new(),
        }
    }

    /// Copy of the city without its nested points of interest
    pub fn without_points_of_interest(&self) -> Self {
        Self {
            points_of_interest: Vec::new(),
            ..self.clone()
        }
    }
}

/// City fields supplied by a caller; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCity {
    pub name: String,
    pub description: Option<String>,
}
