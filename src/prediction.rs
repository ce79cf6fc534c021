//! Scoring service response types and the prediction failure kind

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregate statistics of the members of one cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterCharacteristics {
    pub avg_income: f64,
    pub avg_spending_score: f64,
    pub avg_total_spend: f64,
    pub avg_purchase_frequency: f64,
    pub avg_recency: f64,
}

/// Successful response of `POST /api/predict_cluster`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Segment id assigned by the scoring service
    pub cluster: i64,
    /// Number of reference customers in that segment
    pub cluster_size: u64,
    pub cluster_characteristics: ClusterCharacteristics,
}

/// The only way a prediction can fail.
///
/// Transport errors, non-2xx statuses and undecodable bodies all collapse
/// into `RequestFailed`; the message is kept for logs only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("prediction request failed: {0}")]
    RequestFailed(String),
}

impl PredictionError {
    pub fn request_failed(reason: impl Into<String>) -> Self {
        PredictionError::RequestFailed(reason.into())
    }
}
