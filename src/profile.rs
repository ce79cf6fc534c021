//! Customer profile held by the dashboard form
//!
//! The profile is the request body of a prediction call. Range limits live
//! here only as input-widget limits: they are checked when a field is edited,
//! never when a profile is sent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const AGE_MIN: u32 = 18;
pub const AGE_MAX: u32 = 100;
pub const INCOME_MIN: u64 = 20_000;
pub const SPENDING_SCORE_MIN: u32 = 1;
pub const SPENDING_SCORE_MAX: u32 = 100;
pub const RECENCY_MAX: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::Invalid {
                field: ProfileField::Gender,
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::North,
        Region::South,
        Region::East,
        Region::West,
        Region::Central,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::North => "North",
            Region::South => "South",
            Region::East => "East",
            Region::West => "West",
            Region::Central => "Central",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::Invalid {
                field: ProfileField::Region,
                value: s.to_string(),
            })
    }
}

/// The eight customer attributes sent for scoring.
///
/// Field order and names match the JSON body of `POST /api/predict_cluster`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub age: u32,
    pub gender: Gender,
    pub income: u64,
    pub spending_score: u32,
    pub region: Region,
    pub purchase_frequency: u32,
    pub avg_order_value: f64,
    pub recency: u32,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        Self {
            age: 35,
            gender: Gender::Male,
            income: 65_000,
            spending_score: 50,
            region: Region::North,
            purchase_frequency: 12,
            avg_order_value: 500.0,
            recency: 30,
        }
    }
}

impl CustomerProfile {
    /// Yearly spend implied by frequency and order value
    pub fn total_spend(&self) -> f64 {
        self.purchase_frequency as f64 * self.avg_order_value
    }

    /// Overwrite one field with an already parsed value
    pub fn set(&mut self, value: FieldValue) {
        match value {
            FieldValue::Age(v) => self.age = v,
            FieldValue::Gender(v) => self.gender = v,
            FieldValue::Income(v) => self.income = v,
            FieldValue::SpendingScore(v) => self.spending_score = v,
            FieldValue::Region(v) => self.region = v,
            FieldValue::PurchaseFrequency(v) => self.purchase_frequency = v,
            FieldValue::AvgOrderValue(v) => self.avg_order_value = v,
            FieldValue::Recency(v) => self.recency = v,
        }
    }

    /// Parse `raw` with the widget limits of `field` and store it.
    ///
    /// On error the profile is left as it was.
    pub fn edit(&mut self, field: ProfileField, raw: &str) -> Result<(), FieldError> {
        let value = field.parse_value(raw)?;
        self.set(value);
        Ok(())
    }
}

/// Names of the editable profile fields, spelled as on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Age,
    Gender,
    Income,
    SpendingScore,
    Region,
    PurchaseFrequency,
    AvgOrderValue,
    Recency,
}

impl ProfileField {
    pub const ALL: [ProfileField; 8] = [
        ProfileField::Age,
        ProfileField::Gender,
        ProfileField::Income,
        ProfileField::SpendingScore,
        ProfileField::Region,
        ProfileField::PurchaseFrequency,
        ProfileField::AvgOrderValue,
        ProfileField::Recency,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProfileField::Age => "age",
            ProfileField::Gender => "gender",
            ProfileField::Income => "income",
            ProfileField::SpendingScore => "spending_score",
            ProfileField::Region => "region",
            ProfileField::PurchaseFrequency => "purchase_frequency",
            ProfileField::AvgOrderValue => "avg_order_value",
            ProfileField::Recency => "recency",
        }
    }

    /// Human readable limits, shown in prompts and error messages
    pub fn limits(&self) -> String {
        match self {
            ProfileField::Age => format!("{}-{}", AGE_MIN, AGE_MAX),
            ProfileField::Gender => join_labels(Gender::ALL.iter().map(Gender::as_str)),
            ProfileField::Income => format!(">= {}", INCOME_MIN),
            ProfileField::SpendingScore => {
                format!("{}-{}", SPENDING_SCORE_MIN, SPENDING_SCORE_MAX)
            }
            ProfileField::Region => join_labels(Region::ALL.iter().map(Region::as_str)),
            ProfileField::PurchaseFrequency => ">= 0".to_string(),
            ProfileField::AvgOrderValue => ">= 0".to_string(),
            ProfileField::Recency => format!("0-{}", RECENCY_MAX),
        }
    }

    /// Parse a raw widget value, enforcing the widget's min/max
    pub fn parse_value(self, raw: &str) -> Result<FieldValue, FieldError> {
        let raw = raw.trim();
        let value = match self {
            ProfileField::Age => FieldValue::Age(self.parse_bounded(raw, AGE_MIN, Some(AGE_MAX))?),
            ProfileField::Gender => FieldValue::Gender(raw.parse()?),
            ProfileField::Income => FieldValue::Income(self.parse_bounded(raw, INCOME_MIN, None)?),
            ProfileField::SpendingScore => FieldValue::SpendingScore(self.parse_bounded(
                raw,
                SPENDING_SCORE_MIN,
                Some(SPENDING_SCORE_MAX),
            )?),
            ProfileField::Region => FieldValue::Region(raw.parse()?),
            ProfileField::PurchaseFrequency => {
                FieldValue::PurchaseFrequency(self.parse_bounded(raw, 0, None)?)
            }
            ProfileField::AvgOrderValue => {
                let v: f64 = raw.parse().map_err(|_| self.invalid(raw))?;
                if !v.is_finite() || v < 0.0 {
                    return Err(self.out_of_range(raw));
                }
                FieldValue::AvgOrderValue(v)
            }
            ProfileField::Recency => {
                FieldValue::Recency(self.parse_bounded(raw, 0, Some(RECENCY_MAX))?)
            }
        };
        Ok(value)
    }

    fn parse_bounded<T>(self, raw: &str, min: T, max: Option<T>) -> Result<T, FieldError>
    where
        T: FromStr + PartialOrd,
    {
        let v: T = raw.parse().map_err(|_| self.invalid(raw))?;
        if v < min || max.map_or(false, |max| v > max) {
            return Err(self.out_of_range(raw));
        }
        Ok(v)
    }

    fn invalid(self, raw: &str) -> FieldError {
        FieldError::Invalid {
            field: self,
            value: raw.to_string(),
        }
    }

    fn out_of_range(self, raw: &str) -> FieldError {
        FieldError::OutOfRange {
            field: self,
            value: raw.to_string(),
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProfileField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        ProfileField::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// A parsed value for exactly one profile field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Age(u32),
    Gender(Gender),
    Income(u64),
    SpendingScore(u32),
    Region(Region),
    PurchaseFrequency(u32),
    AvgOrderValue(f64),
    Recency(u32),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid value '{value}' for {field} (expected {})", .field.limits())]
    Invalid { field: ProfileField, value: String },
    #[error("{field} must be {}, got {value}", .field.limits())]
    OutOfRange { field: ProfileField, value: String },
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(" | ")
}
