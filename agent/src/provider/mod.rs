//! Health-data provider abstraction
//!
//! The agent never talks to a platform health store directly; it goes through
//! this trait so the core stays testable off-device. A host binding (Health
//! Connect on Android, HealthKit on iOS, …) implements the trait against the
//! real record store; [`fake::FakeProvider`] implements it in memory.
//!
//! Query methods take a half-open [`TimeRange`] and return every record
//! overlapping it (for weight, every sample inside it), matching platform
//! time-range-filter semantics. Callers that need stricter containment filter
//! on their side.

pub mod fake;

use async_trait::async_trait;
use healthsync_shared::{NutritionRecord, SleepSession, StepsRecord, SyncError, TimeRange, WeightRecord};

pub use fake::FakeProvider;

/// Abstract source of raw health records
#[async_trait]
pub trait HealthProvider: Send + Sync {
    /// Whether a health-data backend is installed and supported on this host.
    /// Cheap and infallible; a `false` here is surfaced to the user, not
    /// retried.
    fn is_available(&self) -> bool;

    /// Whether every read scope the agent needs has been granted
    async fn has_read_permissions(&self) -> Result<bool, SyncError>;

    async fn steps_between(&self, range: TimeRange) -> Result<Vec<StepsRecord>, SyncError>;

    async fn sleep_sessions_between(&self, range: TimeRange)
        -> Result<Vec<SleepSession>, SyncError>;

    async fn weight_between(&self, range: TimeRange) -> Result<Vec<WeightRecord>, SyncError>;

    async fn nutrition_between(&self, range: TimeRange)
        -> Result<Vec<NutritionRecord>, SyncError>;
}
