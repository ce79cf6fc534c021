//! ClusterDash: a terminal dashboard for customer segment prediction
//!
//! The dashboard holds a customer profile in memory, sends it to a remote
//! scoring service (`POST /api/predict_cluster`) and renders the returned
//! cluster with matching marketing recommendations. Profiles can also be
//! scored in bulk from a CSV file.

pub mod batch;
pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod prediction;
pub mod profile;
pub mod recommendation;
pub mod render;
pub mod session;
pub mod viz;

// Re-export public items for easier access
pub use cli::Args;
pub use client::PredictionClient;
pub use config::Config;
pub use dashboard::{Dashboard, Notification, NotificationLevel};
pub use prediction::{ClusterCharacteristics, PredictionError, PredictionResult};
pub use profile::{CustomerProfile, Gender, ProfileField, Region};
pub use recommendation::{recommend, Recommendation};
pub use viz::create_distribution_chart;

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
