pub mod auth;
pub mod city_policy;
pub mod response;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use city_policy::require_city_policy;
pub use response::{ApiResponse, ApiResult};
