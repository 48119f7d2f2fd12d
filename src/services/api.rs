//! HTTP client for the driver statistics backend
//!
//! The backend is read-only and keyed entirely by path parameters; there are
//! no request bodies and no authentication. The client sits behind the
//! `DriverDataService` trait so the aggregator can be exercised against an
//! in-memory implementation in tests.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::types::{
    Driver, PaddockError, QualifyingResult, RaceDetail, RaceResult, RaceSummary, Result, Season,
    SprintResult, StandingEntry,
};

/// Default backend address, overridable via --api-url or PADDOCK_API_URL
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// HTTP request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Read-only endpoints of the backing service
#[async_trait]
pub trait DriverDataService {
    async fn driver(&self, driver_id: u32) -> Result<Driver>;
    async fn results(&self, driver_id: u32) -> Result<Vec<RaceResult>>;
    async fn races(&self, driver_id: u32) -> Result<Vec<RaceSummary>>;
    async fn qualifying(&self, driver_id: u32) -> Result<Vec<QualifyingResult>>;
    async fn standings(&self, driver_id: u32) -> Result<Vec<StandingEntry>>;
    async fn sprint_results(&self, driver_id: u32) -> Result<Vec<SprintResult>>;
    async fn seasons(&self) -> Result<Vec<Season>>;
    async fn race_detail(&self, driver_id: u32, race_id: u32) -> Result<RaceDetail>;
}

/// reqwest-backed client
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL (trailing slash tolerated)
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a path and decode the JSON body.
    /// Non-2xx becomes `Status`; a body that fails to decode becomes `Parse`.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.client.get(self.url(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PaddockError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| PaddockError::Parse(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl DriverDataService for ApiClient {
    async fn driver(&self, driver_id: u32) -> Result<Driver> {
        self.get_json(&format!("/drivers/{}", driver_id)).await
    }

    async fn results(&self, driver_id: u32) -> Result<Vec<RaceResult>> {
        self.get_json(&format!("/drivers/{}/results", driver_id))
            .await
    }

    async fn races(&self, driver_id: u32) -> Result<Vec<RaceSummary>> {
        self.get_json(&format!("/drivers/{}/races", driver_id)).await
    }

    async fn qualifying(&self, driver_id: u32) -> Result<Vec<QualifyingResult>> {
        self.get_json(&format!("/drivers/{}/qualifying", driver_id))
            .await
    }

    async fn standings(&self, driver_id: u32) -> Result<Vec<StandingEntry>> {
        self.get_json(&format!("/drivers/{}/driver_standings", driver_id))
            .await
    }

    async fn sprint_results(&self, driver_id: u32) -> Result<Vec<SprintResult>> {
        self.get_json(&format!("/drivers/{}/sprint_results", driver_id))
            .await
    }

    async fn seasons(&self) -> Result<Vec<Season>> {
        self.get_json("/seasons/").await
    }

    async fn race_detail(&self, driver_id: u32, race_id: u32) -> Result<RaceDetail> {
        self.get_json(&format!(
            "/drivers/{}/races/{}/full_data/",
            driver_id, race_id
        ))
        .await
    }
}
