//! Text rendering of the dashboard

use crate::dashboard::{Dashboard, Notification, NotificationLevel};
use crate::prediction::PredictionResult;
use crate::profile::CustomerProfile;
use crate::recommendation::recommend;
use std::fmt::Write;

/// Shown while a prediction call is outstanding
pub const ANALYZING: &str = "Analyzing...";

/// Render the whole dashboard: form, then results panel
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let mut out = render_profile(dashboard.profile());
    out.push('\n');

    if dashboard.is_busy() {
        let _ = writeln!(out, "{}\n", ANALYZING);
    }

    match dashboard.prediction() {
        Some(prediction) => out.push_str(&render_prediction(prediction)),
        None => out.push_str(&render_placeholder()),
    }
    out
}

pub fn render_profile(profile: &CustomerProfile) -> String {
    let mut out = String::from("=== Customer Details ===\n");
    let rows = [
        ("Age", profile.age.to_string()),
        ("Gender", profile.gender.to_string()),
        ("Annual Income", format!("${}", format_thousands(profile.income as f64))),
        ("Spending Score", format!("{} / 100", profile.spending_score)),
        ("Region", profile.region.to_string()),
        ("Purchase Frequency", format!("{} per year", profile.purchase_frequency)),
        ("Avg Order Value", format!("${}", format_money(profile.avg_order_value))),
        ("Recency", format!("{} days", profile.recency)),
        ("Total Spend", format!("${}", format_thousands(profile.total_spend()))),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<20} {}", label, value);
    }
    out
}

pub fn render_prediction(prediction: &PredictionResult) -> String {
    let stats = &prediction.cluster_characteristics;
    let recommendation = recommend(prediction.cluster);
    let mut out = String::new();

    let _ = writeln!(out, "=== Cluster {} ===", prediction.cluster);
    out.push_str("Customer belongs to this segment based on their profile\n\n");

    out.push_str("Cluster Characteristics\n");
    let rows = [
        ("Cluster Size", format!("{} customers", prediction.cluster_size)),
        ("Avg Income", format!("${} annual", format_thousands(stats.avg_income))),
        ("Avg Spending Score", format!("{:.1} out of 100", stats.avg_spending_score)),
        ("Avg Total Spend", format!("${} annually", format_thousands(stats.avg_total_spend))),
        ("Avg Purchase Frequency", format!("{:.1} per year", stats.avg_purchase_frequency)),
        ("Avg Recency", format!("{} days ago", stats.avg_recency.round())),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<24} {}", label, value);
    }

    out.push_str("\nMarketing Recommendations\n");
    let _ = writeln!(out, "  {}", recommendation.headline());
    let _ = writeln!(out, "    {}", recommendation.description());
    out.push_str("  Recommended Strategy\n");
    let _ = writeln!(out, "    {}", recommendation.strategy());
    out
}

fn render_placeholder() -> String {
    "=== No Prediction Yet ===\n\
     Enter customer details and run `predict` to see the customer segment\n"
        .to_string()
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Error => "error",
    };
    format!(
        "[{}] {} ({})",
        tag,
        notification.message,
        notification.created_at.format("%H:%M:%S")
    )
}

/// Round to a whole number and group digits by thousands: 80000.4 -> "80,000"
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}{}", sign, group_digits(&format!("{:.0}", rounded.abs())))
}

/// Two decimals with grouped thousands: 1250.5 -> "1,250.50"
pub fn format_money(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(whole), cents)
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
