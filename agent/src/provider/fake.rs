//! In-memory health-data provider
//!
//! Used by the test suite and as the stand-in backend when the agent runs on
//! a host without a platform health store. Records are preset through the
//! setters; availability and permissions are toggles; every query bumps a
//! counter so tests can assert that precondition failures short-circuit
//! before any provider call.

use async_trait::async_trait;
use healthsync_shared::{NutritionRecord, SleepSession, StepsRecord, SyncError, TimeRange, WeightRecord};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::HealthProvider;

/// In-memory [`HealthProvider`] implementation
pub struct FakeProvider {
    available: AtomicBool,
    permissions_granted: AtomicBool,
    steps: Mutex<Vec<StepsRecord>>,
    sleep: Mutex<Vec<SleepSession>>,
    weight: Mutex<Vec<WeightRecord>>,
    nutrition: Mutex<Vec<NutritionRecord>>,
    fail_message: Mutex<Option<String>>,
    permission_checks: AtomicUsize,
    queries: AtomicUsize,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FakeProvider {
    /// An available provider with permissions granted and no records
    pub fn new() -> Self {
        Self {
            available: AtomicBool::new(true),
            permissions_granted: AtomicBool::new(true),
            steps: Mutex::new(Vec::new()),
            sleep: Mutex::new(Vec::new()),
            weight: Mutex::new(Vec::new()),
            nutrition: Mutex::new(Vec::new()),
            fail_message: Mutex::new(None),
            permission_checks: AtomicUsize::new(0),
            queries: AtomicUsize::new(0),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_permissions_granted(&self, granted: bool) {
        self.permissions_granted.store(granted, Ordering::SeqCst);
    }

    /// Make every subsequent record query fail with the given message
    pub fn fail_queries(&self, message: &str) {
        *locked(&self.fail_message) = Some(message.to_string());
    }

    pub fn add_steps(&self, record: StepsRecord) {
        locked(&self.steps).push(record);
    }

    pub fn add_sleep(&self, session: SleepSession) {
        locked(&self.sleep).push(session);
    }

    pub fn add_weight(&self, record: WeightRecord) {
        locked(&self.weight).push(record);
    }

    pub fn add_nutrition(&self, record: NutritionRecord) {
        locked(&self.nutrition).push(record);
    }

    /// Number of record queries served (or failed) so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of permission checks served so far
    pub fn permission_check_count(&self) -> usize {
        self.permission_checks.load(Ordering::SeqCst)
    }

    fn check_failure(&self) -> Result<(), SyncError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        match locked(&self.fail_message).as_deref() {
            Some(message) => Err(SyncError::Provider(message.to_string())),
            None => Ok(()),
        }
    }
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProvider for FakeProvider {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn has_read_permissions(&self) -> Result<bool, SyncError> {
        self.permission_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.permissions_granted.load(Ordering::SeqCst))
    }

    async fn steps_between(&self, range: TimeRange) -> Result<Vec<StepsRecord>, SyncError> {
        self.check_failure()?;
        Ok(locked(&self.steps)
            .iter()
            .filter(|r| range.overlaps(r.start, r.end))
            .cloned()
            .collect())
    }

    async fn sleep_sessions_between(
        &self,
        range: TimeRange,
    ) -> Result<Vec<SleepSession>, SyncError> {
        self.check_failure()?;
        Ok(locked(&self.sleep)
            .iter()
            .filter(|s| range.overlaps(s.start, s.end))
            .cloned()
            .collect())
    }

    async fn weight_between(&self, range: TimeRange) -> Result<Vec<WeightRecord>, SyncError> {
        self.check_failure()?;
        Ok(locked(&self.weight)
            .iter()
            .filter(|r| range.contains(r.time))
            .cloned()
            .collect())
    }

    async fn nutrition_between(
        &self,
        range: TimeRange,
    ) -> Result<Vec<NutritionRecord>, SyncError> {
        self.check_failure()?;
        Ok(locked(&self.nutrition)
            .iter()
            .filter(|r| range.overlaps(r.start, r.end))
            .cloned()
            .collect())
    }
}
