//! Common test utilities for integration tests
//!
//! Builds a sync agent wired to an in-memory provider and store, pointed at
//! whatever server URL a test supplies (usually a wiremock instance).

use chrono::{Local, NaiveDate, Utc};
use healthsync_agent::provider::FakeProvider;
use healthsync_agent::reader::day_range;
use healthsync_agent::store::{shared, MemoryStore, SettingsStore};
use healthsync_agent::sync::SyncAgent;
use healthsync_shared::NutritionRecord;
use std::sync::Arc;
use std::time::Duration;

pub const TEST_TOKEN: &str = "test-token";

/// Test agent wrapper keeping handles to the fakes for assertions
pub struct TestAgent {
    pub agent: SyncAgent,
    pub provider: Arc<FakeProvider>,
}

/// A store pre-configured with endpoint settings
pub fn configured_store(server_url: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set("server_url", server_url).unwrap();
    store.set("token", TEST_TOKEN).unwrap();
    store
}

/// Build an agent over the given store
pub fn build_agent(store: MemoryStore) -> TestAgent {
    let store = shared(store);
    let provider = Arc::new(FakeProvider::new());
    let agent = SyncAgent::new(provider.clone(), store, Duration::from_secs(5))
        .expect("failed to build agent");
    TestAgent { agent, provider }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn yesterday() -> NaiveDate {
    today().pred_opt().unwrap()
}

/// A nutrition record placed squarely inside the given date's day window
pub fn meal_on(date: NaiveDate, origin: &str, kcal: f64) -> NutritionRecord {
    let range = day_range(date, Utc::now());
    let mid = range.start + (range.end - range.start) / 2;
    NutritionRecord {
        start: mid,
        end: mid,
        origin: origin.to_string(),
        energy_kcal: Some(kcal),
        protein_g: Some(kcal / 20.0),
        fat_g: Some(kcal / 30.0),
        carb_g: Some(kcal / 8.0),
    }
}
