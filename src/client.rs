//! HTTP client for the cluster scoring service.
//!
//! Every call is a single, independent `POST /api/predict_cluster`: no retry,
//! no timeout, no caching.

use crate::config::Config;
use crate::prediction::{PredictionError, PredictionResult};
use crate::profile::CustomerProfile;
use tracing::{debug, warn};

/// Scoring service client
#[derive(Debug, Clone)]
pub struct PredictionClient {
    predict_url: String,
    http_client: reqwest::Client,
}

impl PredictionClient {
    /// Create a client for the endpoint described by `config`
    pub fn new(config: &Config) -> crate::Result<Self> {
        let http_client = reqwest::Client::builder().build()?;

        Ok(Self {
            predict_url: config.predict_url(),
            http_client,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Send `profile` verbatim and decode the cluster assignment
    pub async fn predict(
        &self,
        profile: &CustomerProfile,
    ) -> Result<PredictionResult, PredictionError> {
        debug!(url = %self.predict_url, ?profile, "sending prediction request");

        let response = self
            .http_client
            .post(&self.predict_url)
            .json(profile)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "prediction request did not complete");
                PredictionError::request_failed(format!("network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "scoring service rejected prediction");
            return Err(PredictionError::request_failed(format!(
                "server returned {}",
                status.as_u16()
            )));
        }

        let result: PredictionResult = response.json().await.map_err(|e| {
            warn!(error = %e, "undecodable prediction response");
            PredictionError::request_failed(format!("malformed response: {}", e))
        })?;

        debug!(
            cluster = result.cluster,
            cluster_size = result.cluster_size,
            "prediction received"
        );
        Ok(result)
    }
}
