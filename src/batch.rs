//! Batch predictions from a CSV of customer profiles using Polars
//!
//! Each row is scored through the same prediction contract as the form:
//! one request per row, in file order, with failures recorded per row.

use crate::client::PredictionClient;
use crate::prediction::{PredictionError, PredictionResult};
use crate::profile::{CustomerProfile, Gender, Region};
use anyhow::{anyhow, Context};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// Column appended to the output CSV
pub const CLUSTER_COLUMN: &str = "Cluster";

/// Input columns, in profile field order
pub const PROFILE_COLUMNS: [&str; 8] = [
    "Age",
    "Gender",
    "Income",
    "SpendingScore",
    "Region",
    "PurchaseFrequency",
    "AvgOrderValue",
    "Recency",
];

/// Loaded CSV: the input frame plus one profile per row
pub struct BatchInput {
    /// All columns of the input file, kept for the annotated output
    pub frame: DataFrame,
    pub profiles: Vec<CustomerProfile>,
}

/// Outcome of one batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[Result<PredictionResult, PredictionError>]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// Load customer profiles from a CSV file
///
/// # Arguments
/// * `path` - CSV with the columns listed in [`PROFILE_COLUMNS`]; extra columns are kept
///
/// # Returns
/// * `BatchInput` with the raw frame and one profile per data row
pub fn load_profiles(path: &Path) -> crate::Result<BatchInput> {
    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Failed to read CSV from {}", path.display()))?;

    if frame.height() == 0 {
        anyhow::bail!("No customer rows found in {}", path.display());
    }

    let profiles = profiles_from_frame(&frame)?;
    debug!(rows = profiles.len(), "loaded batch profiles");

    Ok(BatchInput { frame, profiles })
}

/// Convert each row of `frame` into a profile
fn profiles_from_frame(frame: &DataFrame) -> crate::Result<Vec<CustomerProfile>> {
    let ages = int_column(frame, "Age")?;
    let genders = str_column(frame, "Gender")?;
    let incomes = int_column(frame, "Income")?;
    let scores = int_column(frame, "SpendingScore")?;
    let regions = str_column(frame, "Region")?;
    let frequencies = int_column(frame, "PurchaseFrequency")?;
    let order_values = float_column(frame, "AvgOrderValue")?;
    let recencies = int_column(frame, "Recency")?;

    (0..frame.height())
        .map(|i| -> crate::Result<CustomerProfile> {
            let row = i + 1;
            Ok(CustomerProfile {
                age: unsigned(ages[i].clone(), "Age", row)?,
                gender: label::<Gender>(genders[i].as_deref(), "Gender", row)?,
                income: unsigned(incomes[i].clone(), "Income", row)?,
                spending_score: unsigned(scores[i].clone(), "SpendingScore", row)?,
                region: label::<Region>(regions[i].as_deref(), "Region", row)?,
                purchase_frequency: unsigned(frequencies[i].clone(), "PurchaseFrequency", row)?,
                avg_order_value: present(order_values[i].clone(), "AvgOrderValue", row)?,
                recency: unsigned(recencies[i].clone(), "Recency", row)?,
            })
        })
        .collect()
}

fn column<'a>(frame: &'a DataFrame, name: &str) -> crate::Result<&'a Series> {
    frame
        .column(name)
        .map_err(|_| anyhow!("Missing column '{}' (expected {})", name, PROFILE_COLUMNS.join(", ")))
}

/// One numeric cell: `None` when empty, `Err` with the raw text when unusable
type Cell<T> = Option<Result<T, String>>;

/// Read whole numbers without truncating or nulling out bad cells
fn int_column(frame: &DataFrame, name: &str) -> crate::Result<Vec<Cell<i64>>> {
    let series = column(frame, name)?;
    let cells: Vec<Cell<i64>> = match series.dtype() {
        DataType::Float32 | DataType::Float64 => series
            .strict_cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(whole_number))
            .collect(),
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| v.map(parse_whole_number))
            .collect(),
        _ => series
            .strict_cast(&DataType::Int64)?
            .i64()?
            .into_iter()
            .map(|v| v.map(Ok))
            .collect(),
    };
    Ok(cells)
}

fn float_column(frame: &DataFrame, name: &str) -> crate::Result<Vec<Cell<f64>>> {
    let series = column(frame, name)?;
    let cells: Vec<Cell<f64>> = match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|v| {
                v.map(|raw| match raw.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => Ok(n),
                    _ => Err(raw.to_string()),
                })
            })
            .collect(),
        _ => series
            .strict_cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.map(Ok))
            .collect(),
    };
    Ok(cells)
}

fn str_column(frame: &DataFrame, name: &str) -> crate::Result<Vec<Option<String>>> {
    let series = column(frame, name)?.strict_cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn whole_number(v: f64) -> Result<i64, String> {
    if v.is_finite() && v.fract() == 0.0 {
        Ok(v as i64)
    } else {
        Err(v.to_string())
    }
}

fn parse_whole_number(raw: &str) -> Result<i64, String> {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v);
    }
    match trimmed.parse::<f64>() {
        Ok(v) => whole_number(v).map_err(|_| raw.to_string()),
        Err(_) => Err(raw.to_string()),
    }
}

fn unsigned<T: TryFrom<i64>>(cell: Cell<i64>, name: &str, row: usize) -> crate::Result<T> {
    let value = present(cell, name, row)?;
    T::try_from(value).map_err(|_| anyhow!("Row {}: {} value {} is out of range", row, name, value))
}

fn present<T>(cell: Cell<T>, name: &str, row: usize) -> crate::Result<T> {
    match cell {
        None => Err(anyhow!("Row {}: missing {}", row, name)),
        Some(Err(raw)) => Err(anyhow!("Row {}: invalid {} value '{}'", row, name, raw)),
        Some(Ok(value)) => Ok(value),
    }
}

fn label<T: std::str::FromStr>(value: Option<&str>, name: &str, row: usize) -> crate::Result<T> {
    let value = value.ok_or_else(|| anyhow!("Row {}: missing {}", row, name))?;
    value
        .parse()
        .map_err(|_| anyhow!("Row {}: unknown {} '{}'", row, name, value))
}

/// Score every profile, one request per row, in order
pub async fn predict_all(
    client: &PredictionClient,
    profiles: &[CustomerProfile],
) -> Vec<Result<PredictionResult, PredictionError>> {
    let mut outcomes = Vec::with_capacity(profiles.len());
    for (i, profile) in profiles.iter().enumerate() {
        let outcome = client.predict(profile).await;
        if let Err(e) = &outcome {
            info!(row = i + 1, error = %e, "row prediction failed");
        }
        outcomes.push(outcome);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch prediction finished"
    );
    outcomes
}

/// Count successfully scored rows per cluster, ascending by cluster id
pub fn cluster_distribution(
    outcomes: &[Result<PredictionResult, PredictionError>],
) -> BTreeMap<i64, usize> {
    let mut distribution = BTreeMap::new();
    for result in outcomes.iter().flatten() {
        *distribution.entry(result.cluster).or_insert(0) += 1;
    }
    distribution
}

/// Append the `Cluster` column (null for failed rows) and write the frame as CSV
pub fn write_predictions(
    frame: &mut DataFrame,
    outcomes: &[Result<PredictionResult, PredictionError>],
    path: &Path,
) -> crate::Result<()> {
    if outcomes.len() != frame.height() {
        anyhow::bail!(
            "Got {} predictions for {} rows",
            outcomes.len(),
            frame.height()
        );
    }

    let clusters: Vec<Option<i64>> = outcomes
        .iter()
        .map(|o| o.as_ref().ok().map(|p| p.cluster))
        .collect();
    frame.with_column(Series::new(CLUSTER_COLUMN, clusters))?;

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;

    info!(path = %path.display(), "predictions written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::ClusterCharacteristics;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "CustomerID,Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "1,35,Male,65000,50,North,12,500,30").unwrap();
        writeln!(file, "2,52,Female,120000,81,Central,30,1250.5,4").unwrap();
        writeln!(file, "3,23,Other,28000,12,East,2,60,200").unwrap();
        file
    }

    fn ok(cluster: i64) -> Result<PredictionResult, PredictionError> {
        Ok(PredictionResult {
            cluster,
            cluster_size: 10,
            cluster_characteristics: ClusterCharacteristics {
                avg_income: 1.0,
                avg_spending_score: 1.0,
                avg_total_spend: 1.0,
                avg_purchase_frequency: 1.0,
                avg_recency: 1.0,
            },
        })
    }

    #[test]
    fn test_load_profiles() {
        let file = create_test_csv();
        let input = load_profiles(file.path()).unwrap();

        assert_eq!(input.profiles.len(), 3);
        assert_eq!(input.profiles[0], CustomerProfile::default());
        assert_eq!(input.profiles[1].gender, Gender::Female);
        assert_eq!(input.profiles[1].region, Region::Central);
        assert_eq!(input.profiles[1].avg_order_value, 1250.5);
        assert_eq!(input.profiles[2].recency, 200);
        assert_eq!(input.frame.width(), 9);
    }

    #[test]
    fn test_missing_column_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income").unwrap();
        writeln!(file, "35,Male,65000").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert!(err.to_string().contains("Missing column 'SpendingScore'"));
    }

    #[test]
    fn test_unknown_region_names_row() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "35,Male,65000,50,North,12,500,30").unwrap();
        writeln!(file, "40,Male,65000,50,Atlantis,12,500,30").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_fractional_count_is_invalid_not_truncated() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "35.0,Male,65000,50,North,12,500,30").unwrap();
        writeln!(file, "35.9,Male,65000,50,North,12,500,30").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert_eq!(err.to_string(), "Row 2: invalid Age value '35.9'");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "35,Male,65000.75,50,North,12,500,30").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert_eq!(err.to_string(), "Row 1: invalid Income value '65000.75'");
    }

    #[test]
    fn test_whole_floats_are_accepted() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "35.0,Male,65000.0,50,North,12,500,30").unwrap();

        let input = load_profiles(file.path()).unwrap();
        assert_eq!(input.profiles[0], CustomerProfile::default());
    }

    #[test]
    fn test_text_in_numeric_column_is_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "thirty,Male,65000,50,North,12,500,30").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert_eq!(err.to_string(), "Row 1: invalid Age value 'thirty'");

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "35,Male,65000,50,North,12,cheap,30").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert_eq!(err.to_string(), "Row 1: invalid AvgOrderValue value 'cheap'");
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Age,Gender,Income,SpendingScore,Region,PurchaseFrequency,AvgOrderValue,Recency").unwrap();
        writeln!(file, "35,Male,65000,50,North,12,500,30").unwrap();
        writeln!(file, ",Male,65000,50,North,12,500,30").unwrap();

        let err = load_profiles(file.path()).err().unwrap();
        assert_eq!(err.to_string(), "Row 2: missing Age");
    }

    #[test]
    fn test_demo_customers_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/customers.csv");
        let input = load_profiles(&path).unwrap();

        assert_eq!(input.profiles.len(), 5);
        assert_eq!(input.profiles[0], CustomerProfile::default());
        assert_eq!(input.profiles[1].avg_order_value, 1250.5);
    }

    #[test]
    fn test_cluster_distribution_skips_failures() {
        let outcomes = vec![
            ok(1),
            ok(0),
            Err(PredictionError::request_failed("server returned 500")),
            ok(1),
        ];

        let distribution = cluster_distribution(&outcomes);
        assert_eq!(distribution.into_iter().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);

        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(
            summary,
            BatchSummary {
                total: 4,
                succeeded: 3,
                failed: 1
            }
        );
    }

    #[test]
    fn test_write_predictions_appends_cluster_column() {
        let file = create_test_csv();
        let mut input = load_profiles(file.path()).unwrap();
        let outcomes = vec![ok(0), Err(PredictionError::request_failed("x")), ok(1)];

        let out = NamedTempFile::new().unwrap();
        write_predictions(&mut input.frame, &outcomes, out.path()).unwrap();

        let written = std::fs::read_to_string(out.path()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert!(lines[0].ends_with(",Cluster"));
        assert!(lines[1].ends_with(",0"));
        assert!(lines[2].ends_with(','));
        assert!(lines[3].ends_with(",1"));
    }

    #[test]
    fn test_write_predictions_length_mismatch() {
        let file = create_test_csv();
        let mut input = load_profiles(file.path()).unwrap();
        let out = NamedTempFile::new().unwrap();

        assert!(write_predictions(&mut input.frame, &[ok(0)], out.path()).is_err());
    }
}
