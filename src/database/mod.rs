pub mod manager;
pub mod memory;
pub mod models;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod seed;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCityInfoStore;
pub use pagination::{PageRequest, PaginationMetadata};
pub use postgres::PgCityInfoStore;
pub use repository::CityInfoRepository;
pub use store::{CityInfoStore, CityQuery, PendingChange};
