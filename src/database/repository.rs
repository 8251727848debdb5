use std::sync::Arc;

use tracing::{debug, info};

use super::manager::DatabaseError;
use super::models::{City, NewCity, NewPointOfInterest, PointOfInterest};
use super::pagination::PaginationMetadata;
use super::store::{CityInfoStore, CityQuery, PendingChange};

/// Per-request facade over a `CityInfoStore`.
///
/// Reads go straight to the store. Mutations are staged in this repository and
/// only reach the store, all at once, through `save_changes`. Dropping the
/// repository discards whatever is still staged.
pub struct CityInfoRepository {
    store: Arc<dyn CityInfoStore>,
    pending: Vec<PendingChange>,
}

impl CityInfoRepository {
    pub fn new(store: Arc<dyn CityInfoStore>) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    pub async fn get_cities(&self) -> Result<Vec<City>, DatabaseError> {
        self.store.all_cities().await
    }

    pub async fn get_cities_page(&self, query: &CityQuery) -> Result<(Vec<City>, PaginationMetadata), DatabaseError> {
        let (cities, total) = self.store.list_cities(query).await?;
        Ok((cities, PaginationMetadata::new(total, query.page)))
    }

    pub async fn get_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError> {
        self.store.find_city(city_id, include_points_of_interest).await
    }

    pub async fn city_exists(&self, city_id: i32) -> Result<bool, DatabaseError> {
        self.store.city_exists(city_id).await
    }

    pub async fn get_points_of_interest_for_city(&self, city_id: i32) -> Result<Vec<PointOfInterest>, DatabaseError> {
        self.store.points_of_interest_for_city(city_id).await
    }

    pub async fn get_point_of_interest_for_city(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        self.store.find_point_of_interest(city_id, point_of_interest_id).await
    }

    /// True only when the city exists and its name is exactly `city_name`.
    /// A missing or empty claim never matches.
    pub async fn city_name_matches_city_id(&self, city_name: Option<&str>, city_id: i32) -> Result<bool, DatabaseError> {
        let Some(city_name) = city_name.filter(|name| !name.is_empty()) else {
            return Ok(false);
        };

        Ok(self
            .store
            .find_city(city_id, false)
            .await?
            .map_or(false, |city| city.name == city_name))
    }

    /// Stages an insert under `city_id` and returns the point with its reserved id
    pub async fn add_point_of_interest_for_city(
        &mut self,
        city_id: i32,
        draft: NewPointOfInterest,
    ) -> Result<PointOfInterest, DatabaseError> {
        let id = self.store.next_point_of_interest_id().await?;
        let point = PointOfInterest::from_draft(id, city_id, draft);
        self.pending.push(PendingChange::InsertPointOfInterest(point.clone()));
        Ok(point)
    }

    /// Stages a full replace of the point's name and description
    pub fn update_point_of_interest(&mut self, point: &PointOfInterest) {
        self.pending.push(PendingChange::UpdatePointOfInterest(point.clone()));
    }

    pub fn delete_point_of_interest(&mut self, point: &PointOfInterest) {
        self.pending.push(PendingChange::DeletePointOfInterest {
            city_id: point.city_id,
            point_of_interest_id: point.id,
        });
    }

    pub async fn add_city(&mut self, draft: NewCity) -> Result<City, DatabaseError> {
        let id = self.store.next_city_id().await?;
        let city = City {
            id,
            name: draft.name,
            description: draft.description,
            points_of_interest: Vec::new(),
        };
        self.pending.push(PendingChange::InsertCity(city.clone()));
        Ok(city)
    }

    /// Stages removal of the city together with its points of interest
    pub fn delete_city(&mut self, city: &City) {
        self.pending.push(PendingChange::DeleteCity { city_id: city.id });
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Commits everything staged so far. Returns whether any row was affected.
    pub async fn save_changes(&mut self) -> Result<bool, DatabaseError> {
        let changes = std::mem::take(&mut self.pending);
        if changes.is_empty() {
            debug!("save_changes called with nothing staged");
            return Ok(false);
        }

        let staged = changes.len();
        let affected = self.store.commit(changes).await?;
        info!(staged, affected, "Saved changes");
        Ok(affected > 0)
    }
}
