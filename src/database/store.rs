use async_trait::async_trait;

use super::manager::DatabaseError;
use super::models::{City, PointOfInterest};
use super::pagination::PageRequest;

/// Filters for a paginated city listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    /// Exact, case-insensitive name match
    pub name: Option<String>,
    /// Substring of name or description
    pub search_query: Option<String>,
    pub page: PageRequest,
}

impl CityQuery {
    /// Trims both filters and drops the blank ones
    pub fn new(name: Option<&str>, search_query: Option<&str>, page: PageRequest) -> Self {
        fn normalize(value: Option<&str>) -> Option<String> {
            value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
        }

        Self {
            name: normalize(name),
            search_query: normalize(search_query),
            page,
        }
    }

    pub fn matches(&self, city: &City) -> bool {
        if let Some(name) = &self.name {
            if city.name.to_lowercase() != name.to_lowercase() {
                return false;
            }
        }
        if let Some(search) = &self.search_query {
            let in_name = city.name.contains(search.as_str());
            let in_description = city
                .description
                .as_deref()
                .map_or(false, |d| d.contains(search.as_str()));
            if !in_name && !in_description {
                return false;
            }
        }
        true
    }
}

/// A mutation buffered by a repository until `save_changes`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingChange {
    InsertCity(City),
    /// Removes the city and every point of interest it owns
    DeleteCity { city_id: i32 },
    InsertPointOfInterest(PointOfInterest),
    UpdatePointOfInterest(PointOfInterest),
    DeletePointOfInterest { city_id: i32, point_of_interest_id: i32 },
}

/// Query, id reservation and atomic commit over the backing storage
#[async_trait]
pub trait CityInfoStore: Send + Sync {
    /// All cities ordered by name, without points of interest
    async fn all_cities(&self) -> Result<Vec<City>, DatabaseError>;

    /// One page of matching cities ordered by name, plus the total match count
    async fn list_cities(&self, query: &CityQuery) -> Result<(Vec<City>, i64), DatabaseError>;

    async fn find_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError>;

    async fn city_exists(&self, city_id: i32) -> Result<bool, DatabaseError>;

    /// Points of interest of a city ordered by id
    async fn points_of_interest_for_city(&self, city_id: i32) -> Result<Vec<PointOfInterest>, DatabaseError>;

    async fn find_point_of_interest(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, DatabaseError>;

    /// Hands out an unused city id. Ids of abandoned inserts are not reused.
    async fn next_city_id(&self) -> Result<i32, DatabaseError>;

    async fn next_point_of_interest_id(&self) -> Result<i32, DatabaseError>;

    /// Applies every change or none of them. Returns the number of affected rows.
    async fn commit(&self, changes: Vec<PendingChange>) -> Result<u64, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}
