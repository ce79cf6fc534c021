//! Command-line interface definitions and argument parsing

use crate::profile::{CustomerProfile, ProfileField};
use clap::Parser;
use std::path::PathBuf;

/// Customer segment dashboard backed by a remote cluster scoring service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Customer age (18-100)
    #[arg(long)]
    pub age: Option<String>,

    /// Customer gender: Male, Female or Other
    #[arg(long)]
    pub gender: Option<String>,

    /// Annual income in dollars (>= 20000)
    #[arg(long)]
    pub income: Option<String>,

    /// Spending score (1-100)
    #[arg(long)]
    pub spending_score: Option<String>,

    /// Region: North, South, East, West or Central
    #[arg(long)]
    pub region: Option<String>,

    /// Purchases per year (>= 0)
    #[arg(long)]
    pub purchase_frequency: Option<String>,

    /// Average order value in dollars (>= 0)
    #[arg(long)]
    pub avg_order_value: Option<String>,

    /// Days since last purchase (0-365)
    #[arg(long)]
    pub recency: Option<String>,

    /// Scoring service origin; overrides BACKEND_URL
    #[arg(long)]
    pub backend_url: Option<String>,

    /// Batch mode: CSV of customers to score (sample: demos/customers.csv)
    #[arg(short, long, conflicts_with = "interactive")]
    pub batch: Option<PathBuf>,

    /// Output CSV for batch predictions
    #[arg(short, long, default_value = "customer_predictions.csv")]
    pub output: PathBuf,

    /// Output SVG for the batch cluster distribution chart
    #[arg(long, default_value = "cluster_distribution.svg")]
    pub chart: PathBuf,

    /// Edit the form and predict from a prompt
    #[arg(short, long)]
    pub interactive: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Build the starting profile: defaults, overridden by any profile flags.
    ///
    /// Flag values go through the same widget limits as interactive edits.
    pub fn profile(&self) -> crate::Result<CustomerProfile> {
        let mut profile = CustomerProfile::default();
        let flags = [
            (ProfileField::Age, &self.age),
            (ProfileField::Gender, &self.gender),
            (ProfileField::Income, &self.income),
            (ProfileField::SpendingScore, &self.spending_score),
            (ProfileField::Region, &self.region),
            (ProfileField::PurchaseFrequency, &self.purchase_frequency),
            (ProfileField::AvgOrderValue, &self.avg_order_value),
            (ProfileField::Recency, &self.recency),
        ];

        for (field, raw) in flags {
            if let Some(raw) = raw {
                profile.edit(field, raw)?;
            }
        }
        Ok(profile)
    }
}
