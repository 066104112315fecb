//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::watch;

use crate::display::{DisplayConfig, DisplayState};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Latest state published by the scheduler
    pub board: watch::Receiver<DisplayState>,

    /// How rows are selected and faded
    pub display: Arc<DisplayConfig>,

    /// Language tag passed through to the renderer
    pub language: Arc<str>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        board: watch::Receiver<DisplayState>,
        display: DisplayConfig,
        language: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            board,
            display: Arc::new(display),
            language: language.into(),
        }
    }
}
