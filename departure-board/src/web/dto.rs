//! Data transfer objects for web responses.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::display::BoardRow;

/// Board status as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    /// Still waiting for the first refresh
    Loading,
    /// No routes configured
    NeedsConfiguration,
    /// Rows are available
    Ready,
}

/// Response for `GET /departures`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub status: BoardStatus,

    /// Language tag from the configuration
    pub language: String,

    /// When the scheduler last published
    pub updated_at: Option<NaiveDateTime>,

    /// Rows to draw, top to bottom
    pub rows: Vec<BoardRow>,
}
