use std::sync::Arc;

use crate::auth::DemoUserStore;
use crate::config::AppConfig;
use crate::database::MemoryCityInfoStore;
use crate::state::AppState;

/// Development config over a freshly seeded memory store
pub fn test_state() -> AppState {
    AppState::new(AppConfig::development(), Arc::new(MemoryCityInfoStore::seeded()))
}

/// Token for the demo user (city claim `Antwerp`)
pub fn demo_bearer(state: &AppState) -> String {
    bearer_for_city(state, "Antwerp")
}

/// Token for the demo user with the city claim replaced
pub fn bearer_for_city(state: &AppState, city: &str) -> String {
    let mut user = DemoUserStore::demo_user("kevin");
    user.city = city.to_string();
    state.tokens.issue(&user).expect("development config signs tokens")
}
