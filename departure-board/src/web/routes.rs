//! HTTP route handlers.

use axum::{Json, Router, extract::State, routing::get};
use chrono::NaiveDateTime;

use crate::display::{DisplayConfig, DisplayState, visible_rows};

use super::dto::{BoardResponse, BoardStatus};
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/departures", get(departures))
        .route("/departures/raw", get(raw_departures))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Rows to draw right now.
async fn departures(State(state): State<AppState>) -> Json<BoardResponse> {
    let board = state.board.borrow().clone();
    let now = chrono::Local::now().naive_local();
    Json(board_response(&board, &state.display, &state.language, now))
}

/// The full published list, without row selection.
async fn raw_departures(State(state): State<AppState>) -> Json<DisplayState> {
    Json(state.board.borrow().clone())
}

fn board_response(
    board: &DisplayState,
    display: &DisplayConfig,
    language: &str,
    now: NaiveDateTime,
) -> BoardResponse {
    let (status, updated_at, rows) = match board {
        DisplayState::Loading => (BoardStatus::Loading, None, Vec::new()),
        DisplayState::NeedsConfiguration => (BoardStatus::NeedsConfiguration, None, Vec::new()),
        DisplayState::Departures {
            departures,
            updated_at,
        } => (
            BoardStatus::Ready,
            Some(*updated_at),
            visible_rows(departures, display, now),
        ),
    };

    BoardResponse {
        status,
        language: language.to_string(),
        updated_at,
        rows,
    }
}
