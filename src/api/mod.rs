//! GnoBounty HTTP API Module
//! JSON read endpoints over the bounty realm

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use types::*;
