//! Wire payload for the daily summary POST
//!
//! The server expects one JSON document per calendar date. Absent metrics are
//! zero-filled rather than omitted, so a partially-populated day never blocks
//! submission, and every floating value is rounded to one decimal place
//! before serialization.

use crate::snapshot::MetricsSnapshot;
use serde::{Deserialize, Serialize};

/// Value reported in `food_source`; nutrition always arrives through the
/// platform health store regardless of which app originally logged it
pub const FOOD_SOURCE: &str = "health_connect";

/// Round to one decimal place, ties away from zero
///
/// All metric sums are non-negative by construction, so this behaves as
/// round-half-up: `1.05` becomes `1.1`.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Nutrition section of the daily payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodPayload {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carb: f64,
}

/// One day's summary as submitted to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPayload {
    /// `YYYY-MM-DD`
    pub date: String,
    pub steps: u64,
    pub sleep_hours: f64,
    pub weight: f64,
    pub food: FoodPayload,
    pub food_source: String,
}

impl DailyPayload {
    /// Build the zero-filled, rounded payload for a snapshot
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            date: snapshot.date.format("%Y-%m-%d").to_string(),
            steps: snapshot.steps.unwrap_or(0),
            sleep_hours: round1(snapshot.sleep_hours.unwrap_or(0.0)),
            weight: round1(snapshot.weight_kg.unwrap_or(0.0)),
            food: FoodPayload {
                kcal: round1(snapshot.calories.unwrap_or(0.0)),
                protein: round1(snapshot.protein_g.unwrap_or(0.0)),
                fat: round1(snapshot.fat_g.unwrap_or(0.0)),
                carb: round1(snapshot.carb_g.unwrap_or(0.0)),
            },
            food_source: FOOD_SOURCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn rounds_to_one_decimal() {
        assert_eq!(round1(1.04), 1.0);
        assert_eq!(round1(1.05), 1.1);
        assert_eq!(round1(70.24), 70.2);
        assert_eq!(round1(2.0), 2.0);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn snapshot_serializes_to_expected_wire_shape() {
        let mut snapshot =
            MetricsSnapshot::empty(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        snapshot.steps = Some(8000);
        snapshot.weight_kg = Some(70.2);
        snapshot.calories = Some(2000.0);
        snapshot.protein_g = Some(120.4);
        snapshot.fat_g = Some(65.27);
        snapshot.carb_g = Some(210.0);
        snapshot.nutrition_source = Some("fatsecret.app".to_string());
        snapshot.nutrition_origins = vec!["fatsecret.app".to_string()];

        let value = serde_json::to_value(DailyPayload::from_snapshot(&snapshot)).unwrap();
        assert_eq!(
            value,
            json!({
                "date": "2024-03-01",
                "steps": 8000,
                "sleep_hours": 0.0,
                "weight": 70.2,
                "food": {
                    "kcal": 2000.0,
                    "protein": 120.4,
                    "fat": 65.3,
                    "carb": 210.0
                },
                "food_source": "health_connect"
            })
        );
    }

    #[test]
    fn absent_metrics_are_zero_filled() {
        let snapshot = MetricsSnapshot::empty(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        let payload = DailyPayload::from_snapshot(&snapshot);
        assert_eq!(payload.steps, 0);
        assert_eq!(payload.sleep_hours, 0.0);
        assert_eq!(payload.weight, 0.0);
        assert_eq!(payload.food.kcal, 0.0);
    }

    proptest! {
        #[test]
        fn round1_stays_close_and_one_decimal(value in 0.0f64..1_000_000.0) {
            let rounded = round1(value);
            prop_assert!((rounded - value).abs() <= 0.05 + 1e-9);
            // Scaled back up, the result is (nearly) integral
            let scaled = rounded * 10.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }
}
