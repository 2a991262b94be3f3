use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{
    error::AppError,
    service::{clock::Clock, rate_limit::RateLimiter},
};

/// Every 10 minutes, on the minute.
const SWEEP_SCHEDULE: &str = "0 */10 * * * *";

/// Starts the rate limit sweep scheduler
///
/// Periodically drops users whose rate limit windows have fully expired so the limiter's
/// memory tracks active users only. Expired entries are also pruned lazily on every
/// request; this job covers users who never come back.
///
/// # Arguments
/// - `limiter`: Rate limiter to sweep
/// - `clock`: Time source shared with the import service
pub async fn start_scheduler(
    limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(SWEEP_SCHEDULE, move |_uuid, _lock| {
        let limiter = limiter.clone();
        let clock = clock.clone();

        Box::pin(async move {
            sweep(limiter.as_ref(), clock.as_ref()).await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Rate limit sweep scheduler started");

    Ok(())
}

/// Prunes idle rate limit windows as of the clock's current time.
///
/// # Returns
/// - Number of users pruned
pub async fn sweep(limiter: &dyn RateLimiter, clock: &dyn Clock) -> usize {
    let removed = limiter.prune_idle(clock.now()).await;
    if removed > 0 {
        tracing::info!("Rate limit sweep removed {} idle users", removed);
    }
    removed
}
