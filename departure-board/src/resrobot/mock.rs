//! Mock ResRobot client for running without API access.
//!
//! Loads canned trip responses from JSON files and serves them as if they
//! were live API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::domain::{Route, StationId};
use crate::scheduler::TripProvider;

use super::error::ResRobotError;
use super::types::TripList;

/// Mock client that serves trip lists from JSON files.
///
/// Useful for development without a ResRobot API key.
#[derive(Clone)]
pub struct MockResRobotClient {
    /// Pre-loaded responses, keyed by (origin, destination).
    trips: Arc<HashMap<(StationId, StationId), TripList>>,
}

impl MockResRobotClient {
    /// Create a mock client by loading JSON files from a directory.
    ///
    /// Expects files named `{from}-{to}.json`, e.g. `740020749-740021663.json`.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ResRobotError> {
        let data_dir = data_dir.as_ref();
        let mut trips = HashMap::new();

        let entries = std::fs::read_dir(data_dir).map_err(|e| ResRobotError::Api {
            status: 0,
            message: format!("Failed to read mock data directory: {}", e),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| ResRobotError::Api {
                status: 0,
                message: format!("Failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }

            let key = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(parse_route_key)
                .ok_or_else(|| ResRobotError::Api {
                    status: 0,
                    message: format!("Invalid mock filename: {:?}", path),
                })?;

            let json = std::fs::read_to_string(&path).map_err(|e| ResRobotError::Api {
                status: 0,
                message: format!("Failed to read {:?}: {}", path, e),
            })?;

            let list: TripList = serde_json::from_str(&json).map_err(|e| ResRobotError::Json {
                message: format!("Failed to parse {:?}: {}", path, e),
                body: None,
            })?;

            trips.insert(key, list);
        }

        if trips.is_empty() {
            return Err(ResRobotError::Api {
                status: 0,
                message: format!("No mock trip files found in {:?}", data_dir),
            });
        }

        Ok(Self {
            trips: Arc::new(trips),
        })
    }

    /// Routes that have mock data.
    pub fn available_routes(&self) -> Vec<(StationId, StationId)> {
        self.trips.keys().cloned().collect()
    }
}

/// Split a `{from}-{to}` file stem into station ids.
fn parse_route_key(stem: &str) -> Option<(StationId, StationId)> {
    let (from, to) = stem.split_once('-')?;
    Some((StationId::parse(from).ok()?, StationId::parse(to).ok()?))
}

impl TripProvider for MockResRobotClient {
    async fn search_trips(&self, route: &Route) -> Result<TripList, ResRobotError> {
        self.trips
            .get(&(route.from.clone(), route.to.clone()))
            .cloned()
            .ok_or_else(|| ResRobotError::Api {
                status: 404,
                message: format!("No mock data for route {} -> {}", route.from, route.to),
            })
    }
}
