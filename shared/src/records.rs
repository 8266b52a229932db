//! Raw health records as returned by a platform health-data provider
//!
//! These mirror what a provider hands back before any aggregation: each
//! record carries its own timestamps and, for nutrition, the identifier of
//! the application that wrote it (the data origin).

use chrono::{DateTime, Utc};

/// Half-open instant range `[start, end)` used to scope record queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether an instant falls inside the range
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Whether an interval record overlaps the range at all
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end > self.start
    }

    /// Whether an interval record lies entirely within the range
    pub fn encloses(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start && end <= self.end
    }
}

/// A step-count record covering a time window
#[derive(Debug, Clone, PartialEq)]
pub struct StepsRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub count: u64,
}

/// One sleep session; sessions routinely span midnight
#[derive(Debug, Clone, PartialEq)]
pub struct SleepSession {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SleepSession {
    /// Session length in hours (minute resolution, matching provider data)
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_minutes() as f64 / 60.0
    }
}

/// A point-in-time body weight sample
#[derive(Debug, Clone, PartialEq)]
pub struct WeightRecord {
    pub time: DateTime<Utc>,
    pub kilograms: f64,
}

/// A nutrition entry written by some tracking app
///
/// Each nutrient is independently optional: a barcode scan may carry only
/// energy, a manual entry may carry only protein. `origin` identifies the
/// contributing application and drives source selection when several apps
/// log food for the same day.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionRecord {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub origin: String,
    pub energy_kcal: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub carb_g: Option<f64>,
}
