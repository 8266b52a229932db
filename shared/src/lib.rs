//! HealthSync Shared Library
//!
//! This crate contains the pure domain model for the sync agent: raw health
//! records as reported by a platform provider, the per-day metrics snapshot,
//! the nutrition source-selection policy, and the wire payload sent to the
//! server. Everything here is IO-free and synchronous.

pub mod errors;
pub mod nutrition;
pub mod outcome;
pub mod payload;
pub mod records;
pub mod snapshot;

// Re-export commonly used items
pub use errors::SyncError;
pub use nutrition::{aggregate_nutrition, NutritionTotals, MIXED_ORIGINS};
pub use outcome::SyncOutcome;
pub use payload::{DailyPayload, FoodPayload, round1, FOOD_SOURCE};
pub use records::{NutritionRecord, SleepSession, StepsRecord, TimeRange, WeightRecord};
pub use snapshot::MetricsSnapshot;
