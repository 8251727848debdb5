use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::manager::DatabaseError;
use super::models::{City, PointOfInterest};
use super::seed;
use super::store::{CityInfoStore, CityQuery, PendingChange};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    /// Cities are stored without their nested points of interest
    cities: BTreeMap<i32, City>,
    points_of_interest: BTreeMap<i32, PointOfInterest>,
}

impl MemoryState {
    fn apply(&mut self, change: PendingChange) -> Result<u64, DatabaseError> {
        match change {
            PendingChange::InsertCity(city) => {
                if self.cities.contains_key(&city.id) {
                    return Err(DatabaseError::Constraint(format!("city {} already exists", city.id)));
                }
                self.cities.insert(city.id, city.without_points_of_interest());
                Ok(1)
            }
            PendingChange::DeleteCity { city_id } => {
                if self.cities.remove(&city_id).is_none() {
                    return Err(DatabaseError::NotFound(format!("city {}", city_id)));
                }
                let before = self.points_of_interest.len();
                self.points_of_interest.retain(|_, p| p.city_id != city_id);
                Ok(1 + (before - self.points_of_interest.len()) as u64)
            }
            PendingChange::InsertPointOfInterest(point) => {
                if !self.cities.contains_key(&point.city_id) {
                    return Err(DatabaseError::Constraint(format!(
                        "point of interest {} references missing city {}",
                        point.id, point.city_id
                    )));
                }
                if self.points_of_interest.contains_key(&point.id) {
                    return Err(DatabaseError::Constraint(format!(
                        "point of interest {} already exists",
                        point.id
                    )));
                }
                self.points_of_interest.insert(point.id, point);
                Ok(1)
            }
            PendingChange::UpdatePointOfInterest(point) => {
                match self.points_of_interest.get_mut(&point.id) {
                    Some(existing) if existing.city_id == point.city_id => {
                        existing.name = point.name;
                        existing.description = point.description;
                        Ok(1)
                    }
                    _ => Err(DatabaseError::NotFound(format!(
                        "point of interest {} in city {}",
                        point.id, point.city_id
                    ))),
                }
            }
            PendingChange::DeletePointOfInterest { city_id, point_of_interest_id } => {
                match self.points_of_interest.get(&point_of_interest_id) {
                    Some(existing) if existing.city_id == city_id => {
                        self.points_of_interest.remove(&point_of_interest_id);
                        Ok(1)
                    }
                    _ => Err(DatabaseError::NotFound(format!(
                        "point of interest {} in city {}",
                        point_of_interest_id, city_id
                    ))),
                }
            }
        }
    }

    fn points_for(&self, city_id: i32) -> Vec<PointOfInterest> {
        self.points_of_interest
            .values()
            .filter(|p| p.city_id == city_id)
            .cloned()
            .collect()
    }

    fn cities_by_name(&self) -> Vec<&City> {
        let mut cities: Vec<&City> = self.cities.values().collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        cities
    }
}

/// In-process store. Commits are serialized by the write lock and applied to a copy
/// of the state that is only swapped in once every change succeeded.
pub struct MemoryCityInfoStore {
    state: RwLock<MemoryState>,
    next_city_id: AtomicI32,
    next_point_of_interest_id: AtomicI32,
}

impl MemoryCityInfoStore {
    pub fn empty() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            next_city_id: AtomicI32::new(1),
            next_point_of_interest_id: AtomicI32::new(1),
        }
    }

    /// Store preloaded with the demo cities
    pub fn seeded() -> Self {
        Self::with_cities(seed::cities())
    }

    pub fn with_cities(cities: Vec<City>) -> Self {
        let mut state = MemoryState::default();
        for mut city in cities {
            for point in city.points_of_interest.drain(..) {
                state.points_of_interest.insert(point.id, PointOfInterest { city_id: city.id, ..point });
            }
            state.cities.insert(city.id, city);
        }

        let max_city = state.cities.keys().max().copied().unwrap_or(0);
        let max_point = state.points_of_interest.keys().max().copied().unwrap_or(0);

        Self {
            state: RwLock::new(state),
            next_city_id: AtomicI32::new(max_city + 1),
            next_point_of_interest_id: AtomicI32::new(max_point + 1),
        }
    }
}

impl Default for MemoryCityInfoStore {
    fn default() -> Self {
        Self::seeded()
    }
}

#[async_trait]
impl CityInfoStore for MemoryCityInfoStore {
    async fn all_cities(&self) -> Result<Vec<City>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.cities_by_name().into_iter().cloned().collect())
    }

    async fn list_cities(&self, query: &CityQuery) -> Result<(Vec<City>, i64), DatabaseError> {
        let state = self.state.read().await;
        let matching: Vec<&City> = state
            .cities_by_name()
            .into_iter()
            .filter(|city| query.matches(city))
            .collect();

        let total = matching.len() as i64;
        let offset = usize::try_from(query.page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.page.limit()).unwrap_or(usize::MAX);
        let page = matching.into_iter().skip(offset).take(limit).cloned().collect();

        Ok((page, total))
    }

    async fn find_city(&self, city_id: i32, include_points_of_interest: bool) -> Result<Option<City>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.cities.get(&city_id).map(|city| {
            let mut city = city.clone();
            if include_points_of_interest {
                city.points_of_interest = state.points_for(city_id);
            }
            city
        }))
    }

    async fn city_exists(&self, city_id: i32) -> Result<bool, DatabaseError> {
        Ok(self.state.read().await.cities.contains_key(&city_id))
    }

    async fn points_of_interest_for_city(&self, city_id: i32) -> Result<Vec<PointOfInterest>, DatabaseError> {
        Ok(self.state.read().await.points_for(city_id))
    }

    async fn find_point_of_interest(
        &self,
        city_id: i32,
        point_of_interest_id: i32,
    ) -> Result<Option<PointOfInterest>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .points_of_interest
            .get(&point_of_interest_id)
            .filter(|p| p.city_id == city_id)
            .cloned())
    }

    async fn next_city_id(&self) -> Result<i32, DatabaseError> {
        Ok(self.next_city_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn next_point_of_interest_id(&self) -> Result<i32, DatabaseError> {
        Ok(self.next_point_of_interest_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn commit(&self, changes: Vec<PendingChange>) -> Result<u64, DatabaseError> {
        let mut state = self.state.write().await;
        let mut working = state.clone();

        let mut affected = 0;
        for change in changes {
            affected += working.apply(change)?;
        }

        // Keep reserved ids ahead of anything inserted with an explicit id
        if let Some(max) = working.cities.keys().max() {
            self.next_city_id.fetch_max(max + 1, Ordering::SeqCst);
        }
        if let Some(max) = working.points_of_interest.keys().max() {
            self.next_point_of_interest_id.fetch_max(max + 1, Ordering::SeqCst);
        }

        *state = working;
        debug!(affected, "Committed memory store changes");
        Ok(affected)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
