//! HTTP client for the simulation backend
//!
//! Thin typed wrapper over the backend's JSON API. Every failure is mapped
//! to `GameError::Backend` with the transport or server message attached;
//! retry policy belongs to the caller.

use super::{MoveOutcome, SimulationBackend, ValueMap};
use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP implementation of the backend capability set
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &GameConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GameError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &Req,
    ) -> Result<Resp> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| GameError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::Backend(format!(
                "{} returned {}: {}",
                endpoint, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GameError::Backend(e.to_string()))
    }

    async fn get<Resp: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<Resp> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| GameError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(GameError::Backend(format!(
                "{} returned {}: {}",
                endpoint, status, error_text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GameError::Backend(e.to_string()))
    }
}

impl SimulationBackend for HttpBackend {
    async fn init(&mut self, grid_size: usize) -> Result<ValueMap> {
        let response: GridResponse = self
            .post("init", &InitRequest { grid_size })
            .await?;
        Ok(response.grid)
    }

    async fn make_move(&mut self, index: usize) -> Result<MoveOutcome> {
        self.post("move", &MoveRequest { index }).await
    }

    async fn is_complete(&mut self) -> Result<bool> {
        let response: CompleteResponse = self.get("complete").await?;
        Ok(response.complete)
    }

    async fn get_accuracy(&mut self) -> Result<f64> {
        let response: AccuracyResponse = self.get("accuracy").await?;
        Ok(response.accuracy)
    }

    async fn current_value_map(&mut self) -> Result<ValueMap> {
        let response: GridResponse = self.get("map").await?;
        Ok(response.grid)
    }
}

#[derive(Serialize)]
struct InitRequest {
    grid_size: usize,
}

#[derive(Serialize)]
struct MoveRequest {
    index: usize,
}

#[derive(Deserialize)]
struct GridResponse {
    grid: ValueMap,
}

#[derive(Deserialize)]
struct CompleteResponse {
    complete: bool,
}

#[derive(Deserialize)]
struct AccuracyResponse {
    accuracy: f64,
}
