//! Metrics reader - aggregates raw provider records into a per-date snapshot
//!
//! Windowing rules:
//! - Steps and nutrition use the target date's local-time day window, with
//!   the upper bound clamped to `now` so a query for today never reaches into
//!   the future.
//! - Sleep uses a 36-hour lookback ending at `now` (not at end of day),
//!   because sleep sessions span midnight; the session with the latest end
//!   wins.
//! - Weight uses a 7-day lookback ending at `now`; the most recent sample
//!   wins.
//!
//! "No data" is never an error here. Only provider faults propagate.

use chrono::{DateTime, Days, Duration, Local, NaiveDate, Utc};
use healthsync_shared::{aggregate_nutrition, MetricsSnapshot, SyncError, TimeRange};
use tracing::debug;

use crate::provider::HealthProvider;

/// Sleep sessions are searched this far back from `now`
const SLEEP_LOOKBACK_HOURS: i64 = 36;
/// Weight samples are searched this far back from `now`
const WEIGHT_LOOKBACK_DAYS: i64 = 7;

/// The local-time day window for a date, clamped so it never extends past
/// `now`
pub fn day_range(date: NaiveDate, now: DateTime<Utc>) -> TimeRange {
    let start = local_start_of_day(date);
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);
    let end = local_start_of_day(next).min(now).max(start);
    TimeRange::new(start, end)
}

fn local_start_of_day(date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_hms_opt(0, 0, 0).expect("00:00:00 is a valid time");
    midnight
        .and_local_timezone(Local)
        .earliest()
        // Midnight skipped by a DST transition; treat the naive instant as UTC
        .map_or_else(
            || DateTime::<Utc>::from_naive_utc_and_offset(midnight, Utc),
            |local| local.with_timezone(&Utc),
        )
}

/// Produces a [`MetricsSnapshot`] for an arbitrary calendar date
pub struct MetricsReader<'a> {
    provider: &'a dyn HealthProvider,
}

impl<'a> MetricsReader<'a> {
    pub fn new(provider: &'a dyn HealthProvider) -> Self {
        Self { provider }
    }

    /// Read and aggregate all metrics for `date`, evaluated as of `now`
    pub async fn read_metrics(
        &self,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<MetricsSnapshot, SyncError> {
        let day = day_range(date, now);

        let mut snapshot = MetricsSnapshot::empty(date);
        snapshot.steps = self.read_steps(day).await?;
        snapshot.sleep_hours = self.read_latest_sleep_hours(now).await?;
        snapshot.weight_kg = self.read_latest_weight(now).await?;

        let nutrition = aggregate_nutrition(&self.provider.nutrition_between(day).await?);
        snapshot.calories = nutrition.calories;
        snapshot.protein_g = nutrition.protein_g;
        snapshot.fat_g = nutrition.fat_g;
        snapshot.carb_g = nutrition.carb_g;
        snapshot.nutrition_source = nutrition.source;
        snapshot.nutrition_origins = nutrition.origins;

        debug!(date = %date, ?snapshot.steps, ?snapshot.sleep_hours, "metrics read");
        Ok(snapshot)
    }

    /// Sum of step records whose window falls entirely within the day
    async fn read_steps(&self, day: TimeRange) -> Result<Option<u64>, SyncError> {
        let records = self.provider.steps_between(day).await?;
        let mut total: Option<u64> = None;
        for record in records {
            if day.encloses(record.start, record.end) {
                total = Some(total.unwrap_or(0) + record.count);
            }
        }
        Ok(total)
    }

    async fn read_latest_sleep_hours(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<f64>, SyncError> {
        let range = TimeRange::new(now - Duration::hours(SLEEP_LOOKBACK_HOURS), now);
        let sessions = self.provider.sleep_sessions_between(range).await?;
        Ok(sessions
            .iter()
            .max_by_key(|s| s.end)
            .map(|s| s.duration_hours()))
    }

    async fn read_latest_weight(&self, now: DateTime<Utc>) -> Result<Option<f64>, SyncError> {
        let range = TimeRange::new(now - Duration::days(WEIGHT_LOOKBACK_DAYS), now);
        let records = self.provider.weight_between(range).await?;
        Ok(records
            .iter()
            .max_by_key(|r| r.time)
            .map(|r| r.kilograms))
    }
}
