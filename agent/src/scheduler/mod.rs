//! Named single-flight job scheduling
//!
//! The sync core must never run two attempts of the same job concurrently,
//! and "sync now" requests must coalesce instead of stacking. Each named job
//! gets exactly one tokio task that alternates between waiting (for the next
//! period tick or a wake-up) and running the job, so single-flight holds by
//! construction. Re-scheduling an existing name replaces its task; waking a
//! running job queues at most one extra run.

use async_trait::async_trait;
use healthsync_shared::SyncOutcome;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// A unit of schedulable work
#[async_trait]
pub trait SyncJob: Send + Sync {
    async fn run(&self) -> SyncOutcome;
}

struct NamedTask {
    handle: JoinHandle<()>,
    wake: Arc<Notify>,
}

/// Scheduler with named, idempotent-enqueue semantics
#[derive(Default)]
pub struct JobScheduler {
    tasks: Mutex<HashMap<String, NamedTask>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `job` immediately, then every `period`
    ///
    /// Idempotent by name: scheduling an already-known name replaces the
    /// previous task rather than adding a second one.
    pub async fn schedule_periodic(
        &self,
        name: &str,
        period: Duration,
        job: Arc<dyn SyncJob>,
    ) {
        let wake = Arc::new(Notify::new());
        let task_wake = Arc::clone(&wake);
        let task_name = name.to_string();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A slow job must not cause a burst of catch-up runs
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = task_wake.notified() => {}
                }
                let outcome = job.run().await;
                debug!(job = %task_name, ok = outcome.ok, message = %outcome.message, "job finished");
            }
        });

        let mut tasks = self.tasks.lock().await;
        if let Some(previous) = tasks.insert(name.to_string(), NamedTask { handle, wake }) {
            info!(job = %name, "replacing scheduled job");
            previous.handle.abort();
        }
    }

    /// Wake the named job for an immediate run; returns false for unknown
    /// names. Requests arriving while the job executes coalesce into at most
    /// one follow-up run.
    pub async fn run_now(&self, name: &str) -> bool {
        let tasks = self.tasks.lock().await;
        match tasks.get(name) {
            Some(task) => {
                task.wake.notify_one();
                true
            }
            None => false,
        }
    }

    /// Stop and forget the named job
    pub async fn cancel(&self, name: &str) -> bool {
        let mut tasks = self.tasks.lock().await;
        match tasks.remove(name) {
            Some(task) => {
                task.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Abort every scheduled job
    pub async fn shutdown(&self) {
        let mut tasks = self.tasks.lock().await;
        for (name, task) in tasks.drain() {
            debug!(job = %name, "aborting scheduled job");
            task.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingJob {
        runs: AtomicUsize,
    }

    impl CountingJob {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                runs: AtomicUsize::new(0),
            })
        }

        fn runs(&self) -> usize {
            self.runs.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SyncJob for CountingJob {
        async fn run(&self) -> SyncOutcome {
            self.runs.fetch_add(1, Ordering::SeqCst);
            SyncOutcome::success("ok")
        }
    }

    async fn wait_for_runs(job: &CountingJob, expected: usize) {
        for _ in 0..200 {
            if job.runs() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job never reached {expected} runs (got {})", job.runs());
    }

    #[tokio::test]
    async fn periodic_job_runs_immediately_on_schedule() {
        let scheduler = JobScheduler::new();
        let job = CountingJob::new();
        scheduler
            .schedule_periodic("sync", Duration::from_secs(3600), job.clone())
            .await;
        wait_for_runs(&job, 1).await;
        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn run_now_triggers_an_extra_run() {
        let scheduler = JobScheduler::new();
        let job = CountingJob::new();
        scheduler
            .schedule_periodic("sync", Duration::from_secs(3600), job.clone())
            .await;
        wait_for_runs(&job, 1).await;

        assert!(scheduler.run_now("sync").await);
        wait_for_runs(&job, 2).await;
        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn run_now_on_unknown_name_is_a_no_op() {
        let scheduler = JobScheduler::new();
        assert!(!scheduler.run_now("missing").await);
    }

    #[tokio::test]
    async fn rescheduling_replaces_instead_of_stacking() {
        let scheduler = JobScheduler::new();
        let first = CountingJob::new();
        let second = CountingJob::new();

        scheduler
            .schedule_periodic("sync", Duration::from_secs(3600), first.clone())
            .await;
        wait_for_runs(&first, 1).await;

        scheduler
            .schedule_periodic("sync", Duration::from_secs(3600), second.clone())
            .await;
        wait_for_runs(&second, 1).await;

        // The first job's task was aborted; waking the name only reaches the
        // replacement
        let first_runs = first.runs();
        assert!(scheduler.run_now("sync").await);
        wait_for_runs(&second, 2).await;
        assert_eq!(first.runs(), first_runs);

        scheduler.shutdown().await;
    }

    #[tokio::test]
    async fn cancel_stops_the_job() {
        let scheduler = JobScheduler::new();
        let job = CountingJob::new();
        scheduler
            .schedule_periodic("sync", Duration::from_millis(20), job.clone())
            .await;
        wait_for_runs(&job, 1).await;

        assert!(scheduler.cancel("sync").await);
        let runs = job.runs();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(job.runs(), runs);
        assert!(!scheduler.cancel("sync").await);
    }
}
