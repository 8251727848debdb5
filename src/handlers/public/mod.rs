// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus service info and health.

pub mod authentication;
pub mod system;

pub use authentication::authenticate;
pub use system::{health, root};
