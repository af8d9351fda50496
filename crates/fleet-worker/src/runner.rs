//! Task runner: registers every background task with a cron scheduler and
//! stops the scheduler on a shared shutdown signal.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, warn};

use fleet_core::config::WorkerConfig;
use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_database::DatabaseManager;
use fleet_service::{HealthCheckExecutor, StatisticsService};

use crate::schedule::Schedule;
use crate::task::BackgroundTask;
use crate::tasks::{CacheWarmupTask, DatabaseCleanupTask, HealthSamplingTask};

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Owns the registered tasks and schedules them.
#[derive(Default)]
pub struct TaskRunner {
    tasks: Vec<Arc<dyn BackgroundTask>>,
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.tasks.iter().map(|t| t.name()).collect();
        f.debug_struct("TaskRunner").field("tasks", &names).finish()
    }
}

impl TaskRunner {
    /// A runner with no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in maintenance tasks, configured from `config`.
    pub fn standard(
        config: &WorkerConfig,
        statistics: StatisticsService,
        db: DatabaseManager,
        health: HealthCheckExecutor,
    ) -> Self {
        Self::new()
            .with_task(CacheWarmupTask::new(statistics, &config.cache_warmup))
            .with_task(DatabaseCleanupTask::new(db, &config.database_cleanup))
            .with_task(HealthSamplingTask::new(health, &config.health_sampling))
    }

    /// Register a task.
    pub fn with_task(mut self, task: impl BackgroundTask) -> Self {
        self.tasks.push(Arc::new(task));
        self
    }

    /// Schedule every task and start the scheduler.
    ///
    /// The returned handle completes once `shutdown` carries `true` (or its
    /// sender is dropped) and the scheduler has stopped.
    pub async fn start(&self, shutdown: watch::Receiver<bool>) -> AppResult<JoinHandle<()>> {
        let mut scheduler = JobScheduler::new()
            .await
            .map_err(scheduler_error("create task scheduler"))?;

        for task in &self.tasks {
            let job = build_job(Arc::clone(task), shutdown.clone())?;
            scheduler
                .add(job)
                .await
                .map_err(scheduler_error("register background task"))?;
            info!(task = task.name(), schedule = %task.schedule(), "Registered background task");
        }

        scheduler
            .start()
            .await
            .map_err(scheduler_error("start task scheduler"))?;
        info!(count = self.tasks.len(), "Background tasks started");

        let mut shutdown = shutdown;
        Ok(tokio::spawn(async move {
            wait_for_shutdown(&mut shutdown).await;
            if let Err(e) = scheduler.shutdown().await {
                warn!(error = %e, "Task scheduler did not shut down cleanly");
            }
            info!("Background tasks stopped");
        }))
    }
}

fn scheduler_error(action: &'static str) -> impl Fn(JobSchedulerError) -> AppError {
    move |e| AppError::internal(format!("Failed to {action}: {e}"))
}

fn build_job(task: Arc<dyn BackgroundTask>, shutdown: watch::Receiver<bool>) -> AppResult<Job> {
    let name = task.name();
    let running = Arc::new(AtomicBool::new(false));

    let job = match task.schedule() {
        Schedule::Every(interval) => Job::new_repeated_async(interval, move |_id, _scheduler| {
            tick(Arc::clone(&task), shutdown.clone(), Arc::clone(&running))
        }),
        Schedule::DailyAt { hour } => {
            let cron = Schedule::daily_cron(hour);
            Job::new_async(cron.as_str(), move |_id, _scheduler| {
                tick(Arc::clone(&task), shutdown.clone(), Arc::clone(&running))
            })
        }
    };

    job.map_err(|e| AppError::configuration(format!("Invalid schedule for task {name}: {e}")))
}

/// One scheduled firing. A firing that lands while the previous one is
/// still running or retrying is skipped.
fn tick(
    task: Arc<dyn BackgroundTask>,
    mut shutdown: watch::Receiver<bool>,
    running: Arc<AtomicBool>,
) -> JobFuture {
    Box::pin(async move {
        if running.swap(true, Ordering::AcqRel) {
            debug!(task = task.name(), "Previous run still in progress, skipping");
            return;
        }
        run_until_success(task.as_ref(), &mut shutdown).await;
        running.store(false, Ordering::Release);
    })
}

/// Run `task`, retrying after its fixed delay until it succeeds or shutdown is signalled.
async fn run_until_success(task: &dyn BackgroundTask, shutdown: &mut watch::Receiver<bool>) {
    let name = task.name();
    loop {
        if *shutdown.borrow() {
            return;
        }

        let started = Instant::now();
        let outcome = tokio::select! {
            outcome = task.run() => outcome,
            _ = wait_for_shutdown(shutdown) => return,
        };

        match outcome {
            Ok(()) => {
                info!(task = name, elapsed_ms = started.elapsed().as_millis() as u64, "Background task completed");
                return;
            }
            Err(e) => {
                let retry = task.retry_delay();
                error!(task = name, error = %e, retry_in_secs = retry.as_secs(), "Background task failed");
                if !wait(retry, shutdown).await {
                    return;
                }
            }
        }
    }
}

/// Resolves once shutdown is signalled or the sender is gone.
async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Wait for `delay` unless shutdown comes first. Returns `false` on shutdown.
async fn wait(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    tokio::select! {
        _ = time::sleep(delay) => true,
        _ = wait_for_shutdown(shutdown) => false,
    }
}
