//! Watched origin/destination pairs.

use serde::Deserialize;

use super::StationId;

/// One origin/destination pair to poll.
///
/// `label`, when present and non-empty, replaces the destination stop name
/// on every departure whose destination is `to`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Route {
    pub from: StationId,
    pub to: StationId,
    #[serde(default)]
    pub label: Option<String>,
}

impl Route {
    /// Create a route without a label.
    pub fn new(from: StationId, to: StationId) -> Self {
        Self {
            from,
            to,
            label: None,
        }
    }

    /// Attach a display label for the destination.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label override for a destination stop, if this route provides one.
    ///
    /// Empty labels count as absent.
    pub fn label_for(&self, destination_id: &str) -> Option<&str> {
        match self.label.as_deref() {
            Some(label) if !label.is_empty() && self.to.as_str() == destination_id => Some(label),
            _ => None,
        }
    }
}

/// Find the first route that relabels `destination_id`.
pub fn destination_label<'a>(routes: &'a [Route], destination_id: &str) -> Option<&'a str> {
    routes.iter().find_map(|r| r.label_for(destination_id))
}
