pub mod auth;
pub mod cities;
pub mod poi;
