//! Web layer: serves the current board as JSON.
//!
//! A renderer polls `/departures` for ready-to-draw rows; `/health` is a
//! liveness probe.

mod dto;
mod routes;
mod state;

pub use dto::BoardResponse;
pub use routes::create_router;
pub use state::AppState;
