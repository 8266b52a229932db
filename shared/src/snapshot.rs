//! Per-day aggregated metrics
//!
//! # Design Principles
//!
//! 1. **Absent means no data**: every metric is `None` if and only if no
//!    underlying record contributed to it. A genuine zero computed from real
//!    records stays `Some(0.0)`; the two are never conflated.
//! 2. **Immutable date**: a snapshot belongs to exactly one calendar date.

use chrono::NaiveDate;

/// One calendar date's aggregated health data
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    /// The local calendar date the snapshot describes
    pub date: NaiveDate,
    /// Total step count for the date
    pub steps: Option<u64>,
    /// Duration of the most recent sleep session, in hours
    pub sleep_hours: Option<f64>,
    /// Most recent body weight sample, in kilograms
    pub weight_kg: Option<f64>,
    /// Summed energy intake for the date, in kilocalories
    pub calories: Option<f64>,
    /// Summed protein intake, in grams
    pub protein_g: Option<f64>,
    /// Summed fat intake, in grams
    pub fat_g: Option<f64>,
    /// Summed carbohydrate intake, in grams
    pub carb_g: Option<f64>,
    /// The data origin chosen by the nutrition source policy, when any
    /// nutrition record existed for the date
    pub nutrition_source: Option<String>,
    /// Every distinct data origin observed for the date
    pub nutrition_origins: Vec<String>,
}

impl MetricsSnapshot {
    /// A snapshot for a date with no contributing records
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            steps: None,
            sleep_hours: None,
            weight_kg: None,
            calories: None,
            protein_g: None,
            fat_g: None,
            carb_g: None,
            nutrition_source: None,
            nutrition_origins: Vec::new(),
        }
    }
}
