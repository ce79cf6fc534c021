//! ClusterDash: customer segment dashboard for a remote scoring service
//!
//! This is the main entrypoint that wires configuration, the prediction
//! client and the dashboard, then runs one of three modes: a single
//! prediction, an interactive form session, or a CSV batch.

use anyhow::Result;
use clap::Parser;
use clusterdash::{batch, session, viz, Args, Config, Dashboard, PredictionClient};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let default_filter = if args.verbose {
        "clusterdash=debug"
    } else {
        "clusterdash=info"
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    let config = match &args.backend_url {
        Some(url) => Config::with_backend_url(url)?,
        None => Config::from_env()?,
    };
    tracing::debug!(endpoint = %config.predict_url(), "configuration loaded");

    let client = PredictionClient::new(&config)?;

    if let Some(path) = &args.batch {
        run_batch_mode(&args, &client, path).await
    } else if args.interactive {
        run_interactive_mode(&args, &client).await
    } else {
        run_single_prediction(&args, &client).await
    }
}

/// Predict once for the profile given on the command line
async fn run_single_prediction(args: &Args, client: &PredictionClient) -> Result<()> {
    let mut dashboard = Dashboard::with_profile(args.profile()?);

    let mut stdout = std::io::stdout();

    let start_time = Instant::now();
    session::predict_and_report(&mut dashboard, client, &mut stdout).await?;

    if args.verbose {
        println!("\nRequest time: {:.2}s", start_time.elapsed().as_secs_f64());
    }
    Ok(())
}

/// Prompt-driven form session on stdin/stdout
async fn run_interactive_mode(args: &Args, client: &PredictionClient) -> Result<()> {
    let mut dashboard = Dashboard::with_profile(args.profile()?);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();

    session::run(&mut dashboard, client, stdin, &mut stdout).await
}

/// Score every row of a CSV and write the annotated file plus a chart
async fn run_batch_mode(args: &Args, client: &PredictionClient, path: &std::path::Path) -> Result<()> {
    println!("=== Batch Prediction ===\n");
    let start_time = Instant::now();

    let mut input = batch::load_profiles(path)?;
    println!("✓ Loaded {} customers from {}", input.profiles.len(), path.display());

    let outcomes = batch::predict_all(client, &input.profiles).await;
    let summary = batch::BatchSummary::from_outcomes(&outcomes);
    println!(
        "✓ Scored {}/{} customers ({} failed)",
        summary.succeeded, summary.total, summary.failed
    );

    batch::write_predictions(&mut input.frame, &outcomes, &args.output)?;
    println!("Predictions saved to: {}", args.output.display());

    let distribution = batch::cluster_distribution(&outcomes);
    if distribution.is_empty() {
        println!("\nNo successful predictions; skipping distribution chart");
    } else {
        println!("\n=== Cluster Distribution ===");
        for (cluster, count) in &distribution {
            let percentage = (*count as f64 / summary.succeeded as f64) * 100.0;
            println!("Cluster {}: {} customers ({:.1}%)", cluster, count, percentage);
        }
        viz::create_distribution_chart(&distribution, &args.chart)?;
        println!("Distribution chart saved to: {}", args.chart.display());
    }

    if args.verbose {
        println!("\nTotal processing time: {:.2}s", start_time.elapsed().as_secs_f64());
    }
    Ok(())
}
