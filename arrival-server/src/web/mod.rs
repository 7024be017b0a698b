//! Web layer for the arrival server.
//!
//! Serves stop lookups as JSON (`/api/arrivals`) and as an HTML page
//! (`/arrivals`).

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
