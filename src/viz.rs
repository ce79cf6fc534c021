//! Cluster distribution chart using Plotters

use plotters::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;

/// Color palette for different clusters
const CLUSTER_COLORS: [RGBColor; 5] = [RED, BLUE, GREEN, YELLOW, MAGENTA];

/// Draw a bar chart of customers per cluster
///
/// # Arguments
/// * `distribution` - Customer count per cluster id, as built by `batch::cluster_distribution`
/// * `output_path` - Path of the SVG file to write
pub fn create_distribution_chart(
    distribution: &BTreeMap<i64, usize>,
    output_path: &Path,
) -> crate::Result<()> {
    if distribution.is_empty() {
        anyhow::bail!("No successful predictions to chart");
    }

    let n_bars = distribution.len() as u32;
    let max_count = distribution.values().copied().max().unwrap_or(1) as u32;
    let cluster_ids: Vec<i64> = distribution.keys().copied().collect();

    let root = SVGBackend::new(output_path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Customer Distribution Across Clusters", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..n_bars).into_segmented(), 0u32..(max_count + max_count / 10 + 1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(cluster_ids.len() + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => cluster_ids
                .get(*i as usize)
                .map(|id| format!("Cluster {}", id))
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("Number of Customers")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // One bar per position; colors follow the cluster id
    for (position, (&cluster_id, &count)) in distribution.iter().enumerate() {
        let color = CLUSTER_COLORS[cluster_id.rem_euclid(CLUSTER_COLORS.len() as i64) as usize];

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(10)
                .data(std::iter::once((position as u32, count as u32))),
        )?;
    }

    root.present()?;
    Ok(())
}
