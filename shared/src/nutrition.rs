//! Nutrition source selection and aggregation
//!
//! Several apps can write nutrition records for the same day (a dedicated
//! food tracker plus, say, a watch app double-logging meals), and summing
//! across all of them silently double-counts. The policy here prefers a
//! known-good dedicated tracker when one is present:
//!
//! 1. If any origin's identifier contains `"fatsecret"` (case-insensitive),
//!    that origin is used exclusively.
//! 2. Otherwise, if exactly one distinct origin logged food, use it.
//! 3. Otherwise no single origin wins: records from all origins are summed
//!    together and the chosen-origin label is the [`MIXED_ORIGINS`] sentinel.
//!
//! Each nutrient total is `None` when no filtered record carried that
//! nutrient; a sum that happens to equal zero stays `Some(0.0)`.

use crate::records::NutritionRecord;

/// Sentinel origin label meaning "records from all origins were summed"
pub const MIXED_ORIGINS: &str = "all";

/// Aggregated nutrition for one day, after origin filtering
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionTotals {
    pub calories: Option<f64>,
    pub protein_g: Option<f64>,
    pub fat_g: Option<f64>,
    pub carb_g: Option<f64>,
    /// The origin the totals were computed from, or [`MIXED_ORIGINS`];
    /// `None` when there were no records at all
    pub source: Option<String>,
    /// Every distinct origin observed, in first-seen order
    pub origins: Vec<String>,
}

impl NutritionTotals {
    fn empty() -> Self {
        Self {
            calories: None,
            protein_g: None,
            fat_g: None,
            carb_g: None,
            source: None,
            origins: Vec::new(),
        }
    }
}

/// Apply the source-selection policy and sum nutrients over the kept records
pub fn aggregate_nutrition(records: &[NutritionRecord]) -> NutritionTotals {
    if records.is_empty() {
        return NutritionTotals::empty();
    }

    let mut origins: Vec<String> = Vec::new();
    for record in records {
        if !origins.contains(&record.origin) {
            origins.push(record.origin.clone());
        }
    }

    let fatsecret = origins
        .iter()
        .find(|origin| origin.to_lowercase().contains("fatsecret"))
        .cloned();

    let exclusive = match fatsecret {
        Some(origin) => Some(origin),
        None if origins.len() == 1 => Some(origins[0].clone()),
        None => None,
    };

    let source = exclusive
        .clone()
        .unwrap_or_else(|| MIXED_ORIGINS.to_string());

    let mut totals = NutritionTotals::empty();
    totals.source = Some(source);
    totals.origins = origins;

    for record in records {
        if let Some(chosen) = &exclusive {
            if &record.origin != chosen {
                continue;
            }
        }
        accumulate(&mut totals.calories, record.energy_kcal);
        accumulate(&mut totals.protein_g, record.protein_g);
        accumulate(&mut totals.fat_g, record.fat_g);
        accumulate(&mut totals.carb_g, record.carb_g);
    }

    totals
}

fn accumulate(total: &mut Option<f64>, value: Option<f64>) {
    if let Some(v) = value {
        *total = Some(total.unwrap_or(0.0) + v);
    }
}
