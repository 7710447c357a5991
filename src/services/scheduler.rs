use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::database::connection::DatabaseManager;
use crate::database::models::Trainer;
use crate::services::calendar_sync::CalendarSync;
use crate::utils::logging::log_sync_error;

/// Cadence of the auto-sync loop. Each trainer's own interval decides
/// whether a tick actually syncs it.
pub const SYNC_TICK: Duration = Duration::from_secs(60);

/// Outcome of one scheduler tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub synced: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Periodically syncs every trainer with auto-sync enabled.
pub struct SyncScheduler {
    db: DatabaseManager,
    sync: Arc<CalendarSync>,
    scheduler: JobScheduler,
}

impl SyncScheduler {
    pub async fn new(db: DatabaseManager, sync: Arc<CalendarSync>) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            db,
            sync,
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<(), JobSchedulerError> {
        let db = self.db.clone();
        let sync = self.sync.clone();
        let running = Arc::new(Mutex::new(()));

        let sync_job = Job::new_repeated_async(SYNC_TICK, move |_uuid, _l| {
            let db = db.clone();
            let sync = sync.clone();
            let running = running.clone();
            Box::pin(async move {
                // A slow tick must not overlap the next one.
                let Ok(_guard) = running.try_lock() else {
                    tracing::warn!("Previous sync tick still running; skipping this one");
                    return;
                };
                match run_sync_tick(&db, &sync, Utc::now()).await {
                    Ok(report) if report.synced > 0 || report.failed > 0 => {
                        tracing::info!(
                            "Sync tick finished: {} synced, {} failed, {} not due",
                            report.synced, report.failed, report.skipped
                        );
                    }
                    Ok(_) => {}
                    Err(e) => tracing::error!("Sync scheduler tick failed: {}", e),
                }
            })
        })?;

        self.scheduler.add(sync_job).await?;
        self.scheduler.start().await?;

        tracing::info!("Sync scheduler started - checking trainers every {}s", SYNC_TICK.as_secs());
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger for testing
    pub async fn run_now(&self) -> Result<TickReport, sqlx::Error> {
        run_sync_tick(&self.db, &self.sync, Utc::now()).await
    }
}

/// One pass over auto-sync trainers. Every due trainer is synced in its own
/// transaction together with its `last_synced_at`; a failure is logged and
/// does not affect the others.
pub async fn run_sync_tick(
    db: &DatabaseManager,
    sync: &CalendarSync,
    now: DateTime<Utc>,
) -> Result<TickReport, sqlx::Error> {
    let trainers = Trainer::list_sync_enabled(&db.pool).await?;
    let mut report = TickReport::default();

    for trainer in trainers {
        if !trainer.is_sync_due(now) {
            report.skipped += 1;
            continue;
        }

        match sync.sync_and_mark_synced(db, trainer.id, now).await {
            Ok(_) => report.synced += 1,
            Err(e) => {
                log_sync_error(trainer.id, &e.to_string());
                report.failed += 1;
            }
        }
    }

    Ok(report)
}
