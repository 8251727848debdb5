use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PointOfInterest {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub city_id: i32,
}

/// Point of interest fields supplied by a caller; id and city are assigned on staging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPointOfInterest {
    pub name: String,
    pub description: Option<String>,
}

impl PointOfInterest {
    pub fn from_draft(id: i32, city_id: i32, draft: NewPointOfInterest) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            city_id,
        }
    }
}
