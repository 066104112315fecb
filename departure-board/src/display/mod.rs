//! Boundary to whatever renders the board.
//!
//! The scheduler pushes finished departure lists through a [`DisplaySink`].
//! Rendering itself lives elsewhere; this module only provides the sinks
//! and the row selection a renderer needs.

mod rows;
mod sink;

pub use rows::{BoardRow, DisplayConfig, visible_rows};
pub use sink::{DisplaySink, DisplayState, TerminalSink, WatchSink};
