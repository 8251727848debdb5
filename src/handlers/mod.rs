// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer token, optionally the city policy)

pub mod protected;
pub mod public;
