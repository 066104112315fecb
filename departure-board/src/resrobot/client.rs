//! ResRobot trip search HTTP client.
//!
//! Builds one `trip` query per watched route and decodes the response into
//! [`TripList`]. Conversion to departures happens in [`super::normalize`].

use reqwest::Url;
use tracing::debug;

use crate::domain::{ProductsMask, Route};
use crate::scheduler::TripProvider;

use super::error::ResRobotError;
use super::types::TripList;

/// Default trip search endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.resrobot.se/v2/trip";

/// Query keys this client sets itself. Copies already present in a
/// configured base URL are dropped so they are not sent twice.
const MANAGED_KEYS: [&str; 6] = ["format", "passlist", "key", "originId", "destId", "products"];

/// Configuration for the ResRobot client.
#[derive(Debug, Clone)]
pub struct ResRobotConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: String,
    /// Trip search endpoint
    pub base_url: String,
    /// Enabled transport categories
    pub products: ProductsMask,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ResRobotConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            products: ProductsMask::ALL,
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Restrict the transport categories requested.
    pub fn with_products(mut self, products: ProductsMask) -> Self {
        self.products = products;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ResRobot trip search client.
#[derive(Debug, Clone)]
pub struct ResRobotClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    products: ProductsMask,
}

impl ResRobotClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ResRobotConfig) -> Result<Self, ResRobotError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ResRobotError::InvalidBaseUrl {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key,
            products: config.products,
        })
    }

    /// Build the trip search URL for a route.
    ///
    /// Any extra query pairs on the base URL are kept; the parameters this
    /// client manages are always taken from its own configuration.
    pub fn trip_url(&self, route: &Route) -> Url {
        let mut url = self.base_url.clone();
        let extra: Vec<(String, String)> = self
            .base_url
            .query_pairs()
            .filter(|(k, _)| !MANAGED_KEYS.contains(&&**k))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.extend_pairs(extra);
            query
                .append_pair("format", "json")
                .append_pair("passlist", "0")
                .append_pair("key", &self.api_key)
                .append_pair("originId", route.from.as_str())
                .append_pair("destId", route.to.as_str());
            if let Some(products) = self.products.query_value() {
                query.append_pair("products", &products.to_string());
            }
        }

        url
    }

    /// Search trips for a route.
    pub async fn search_trips(&self, route: &Route) -> Result<TripList, ResRobotError> {
        let url = self.trip_url(route);
        debug!(from = %route.from, to = %route.to, "Requesting trips");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ResRobotError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ResRobotError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResRobotError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| ResRobotError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl TripProvider for ResRobotClient {
    async fn search_trips(&self, route: &Route) -> Result<TripList, ResRobotError> {
        ResRobotClient::search_trips(self, route).await
    }
}
