//! Sync orchestrator - drives one end-to-end sync attempt
//!
//! One attempt submits both yesterday's and today's summary, always. The
//! provider's own background sync lags the source apps, so today's steps and
//! nutrition may still be incomplete when we run; re-submitting yesterday on
//! every attempt makes the previous day eventually consistent without any
//! bookkeeping. Missing metrics are zero-filled, never a reason to skip a
//! date.
//!
//! `perform_sync` absorbs every fault. Callers (the scheduler) only ever see
//! a [`SyncOutcome`]; retry policy lives outside this module.

use async_trait::async_trait;
use chrono::{Days, Local, Utc};
use healthsync_shared::{DailyPayload, MetricsSnapshot, SyncError, SyncOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::provider::HealthProvider;
use crate::reader::MetricsReader;
use crate::scheduler::SyncJob;
use crate::store::{SharedStore, SyncState};
use crate::submit::{normalize_url, Submitter};

/// Message reported after a fully successful attempt
pub const MSG_SYNC_OK: &str = "Sync ok";

/// Persisted state surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub last_sync: Option<String>,
    pub last_error: Option<String>,
    pub nutrition_source: Option<String>,
    pub nutrition_origins: Vec<String>,
}

/// The sync orchestrator
pub struct SyncAgent {
    provider: Arc<dyn HealthProvider>,
    store: SharedStore,
    submitter: Submitter,
}

impl SyncAgent {
    pub fn new(
        provider: Arc<dyn HealthProvider>,
        store: SharedStore,
        http_timeout: Duration,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            provider,
            store,
            submitter: Submitter::new(http_timeout)?,
        })
    }

    /// Run one sync attempt; never fails at the type level
    pub async fn perform_sync(&self) -> SyncOutcome {
        match self.try_sync().await {
            Ok(outcome) => outcome,
            Err(err) => {
                let message = match &err {
                    // Precondition errors carry their own user-facing message
                    SyncError::MissingConfig
                    | SyncError::ProviderUnavailable
                    | SyncError::PermissionDenied => err.to_string(),
                    other => format!("Sync error: {other}"),
                };
                warn!(message = %message, "sync attempt aborted");
                self.persist_failure(&message).await;
                SyncOutcome::failure(message)
            }
        }
    }

    /// Read the persisted status for display
    pub async fn status(&self) -> SyncStatus {
        let mut store = self.store.lock().await;
        let state = SyncState::new(store.as_mut());
        SyncStatus {
            last_sync: state.last_sync(),
            last_error: state.last_error(),
            nutrition_source: state.nutrition_source(),
            nutrition_origins: state.nutrition_origins(),
        }
    }

    async fn try_sync(&self) -> Result<SyncOutcome, SyncError> {
        // Preconditions, in order; config is checked before the provider is
        // touched at all
        let (url, token) = {
            let mut store = self.store.lock().await;
            let state = SyncState::new(store.as_mut());
            (state.server_url(), state.token())
        };
        let (Some(url), Some(token)) = (url, token) else {
            return Err(SyncError::MissingConfig);
        };
        if !self.provider.is_available() {
            return Err(SyncError::ProviderUnavailable);
        }
        if !self.provider.has_read_permissions().await? {
            return Err(SyncError::PermissionDenied);
        }

        let now = Utc::now();
        let today = now.with_timezone(&Local).date_naive();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        let endpoint = normalize_url(&url);
        info!(endpoint = %endpoint, "starting sync attempt");

        let reader = MetricsReader::new(self.provider.as_ref());
        let mut failed: Vec<&'static str> = Vec::new();
        let mut today_snapshot: Option<MetricsSnapshot> = None;

        // Sequential and independent: yesterday first, today regardless of
        // how yesterday went
        for (label, date) in [("yesterday", yesterday), ("today", today)] {
            let snapshot = reader.read_metrics(date, now).await?;
            let payload = DailyPayload::from_snapshot(&snapshot);
            match self.submitter.post_day(&endpoint, &token, &payload).await {
                Ok(()) => info!(date = %date, "daily summary submitted"),
                Err(err) => {
                    warn!(date = %date, error = %err, "daily summary submission failed");
                    failed.push(label);
                }
            }
            if label == "today" {
                today_snapshot = Some(snapshot);
            }
        }

        let mut store = self.store.lock().await;
        let mut state = SyncState::new(store.as_mut());
        if failed.is_empty() {
            let stamp = now.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string();
            let (source, origins) = today_snapshot
                .as_ref()
                .map(|s| (s.nutrition_source.as_deref(), s.nutrition_origins.as_slice()))
                .unwrap_or((None, &[]));
            state.record_success(&stamp, source, origins)?;
            info!("sync attempt succeeded");
            Ok(SyncOutcome::success(MSG_SYNC_OK))
        } else {
            let message = format!("Sync failed: {}", failed.join(" "));
            state.record_failure(&message)?;
            Ok(SyncOutcome::failure(message))
        }
    }

    async fn persist_failure(&self, message: &str) {
        let mut store = self.store.lock().await;
        let mut state = SyncState::new(store.as_mut());
        if let Err(err) = state.record_failure(message) {
            warn!(error = %err, "failed to persist sync error");
        }
    }
}

#[async_trait]
impl SyncJob for SyncAgent {
    async fn run(&self) -> SyncOutcome {
        self.perform_sync().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FakeProvider;
    use crate::store::{shared, MemoryStore, SettingsStore};

    fn configured_store() -> SharedStore {
        let mut store = MemoryStore::new();
        store.set("server_url", "http://127.0.0.1:1").unwrap();
        store.set("token", "secret").unwrap();
        shared(store)
    }

    fn agent(provider: Arc<FakeProvider>, store: SharedStore) -> SyncAgent {
        SyncAgent::new(provider, store, Duration::from_millis(200)).unwrap()
    }

    #[tokio::test]
    async fn missing_config_short_circuits_before_any_provider_call() {
        let provider = Arc::new(FakeProvider::new());
        let agent = agent(provider.clone(), shared(MemoryStore::new()));

        let outcome = agent.perform_sync().await;
        assert!(!outcome.ok);
        assert_eq!(outcome.message, "Missing server URL or token");
        assert_eq!(provider.query_count(), 0);
        assert_eq!(provider.permission_check_count(), 0);

        let status = agent.status().await;
        assert_eq!(status.last_error.as_deref(), Some("Missing server URL or token"));
        assert_eq!(status.last_sync, None);
    }

    #[tokio::test]
    async fn unavailable_provider_is_terminal_with_its_own_message() {
        let provider = Arc::new(FakeProvider::new());
        provider.set_available(false);
        let agent = agent(provider.clone(), configured_store());

        let outcome = agent.perform_sync().await;
        assert_eq!(outcome.message, "Health provider not available");
        assert_eq!(provider.query_count(), 0);
    }

    #[tokio::test]
    async fn denied_permissions_are_terminal_with_their_own_message() {
        let provider = Arc::new(FakeProvider::new());
        provider.set_permissions_granted(false);
        let agent = agent(provider.clone(), configured_store());

        let outcome = agent.perform_sync().await;
        assert_eq!(outcome.message, "Permissions not granted");
        assert_eq!(provider.permission_check_count(), 1);
        assert_eq!(provider.query_count(), 0);
    }

    #[tokio::test]
    async fn provider_fault_becomes_a_generic_sync_error() {
        let provider = Arc::new(FakeProvider::new());
        provider.fail_queries("store unreachable");
        let agent = agent(provider.clone(), configured_store());

        let outcome = agent.perform_sync().await;
        assert!(!outcome.ok);
        assert!(outcome.message.starts_with("Sync error: "));
        assert!(outcome.message.contains("store unreachable"));

        let status = agent.status().await;
        assert_eq!(status.last_error, Some(outcome.message));
    }
}
