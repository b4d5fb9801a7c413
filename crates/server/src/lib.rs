pub mod api;
pub mod auth;
pub mod error;
pub mod router;
pub mod startup;
pub mod state;
pub mod store;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
