// handlers/protected/mod.rs - Protected handlers (bearer token required)
//
// Every handler here runs behind `jwt_auth_middleware`. v2 point-of-interest
// routes are additionally layered with `require_city_policy`.

pub mod cities;
pub mod points_of_interest;

pub use cities::get as city_get;
pub use cities::list as cities_list;

pub use points_of_interest::create as point_of_interest_create;
pub use points_of_interest::delete as point_of_interest_delete;
pub use points_of_interest::get as point_of_interest_get;
pub use points_of_interest::list as points_of_interest_list;
pub use points_of_interest::patch as point_of_interest_patch;
pub use points_of_interest::update as point_of_interest_update;
