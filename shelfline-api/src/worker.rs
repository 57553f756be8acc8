use chrono::{DateTime, Duration, Utc};
use tokio::time::sleep;
use tracing::info;

use crate::insights;
use crate::state::AppState;

/// Daily insight regeneration loop. Sleeps until the configured UTC hour,
/// sweeps every product, then waits for the next day.
pub async fn start_insight_worker(state: AppState) {
    info!(
        "Insight worker started, sweeping daily at {:02}:00 UTC",
        state.insights.worker_hour_utc
    );

    loop {
        let delay = delay_until_hour(Utc::now(), state.insights.worker_hour_utc);
        sleep(delay).await;

        info!("Starting scheduled insight generation");
        insights::run_generation_sweep(state.clone()).await;
        info!("Completed scheduled insight generation");
    }
}

/// Duration from `now` until the next occurrence of `hour:00:00` UTC
pub(crate) fn delay_until_hour(now: DateTime<Utc>, hour: u32) -> std::time::Duration {
    let today_run = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_default()
        .and_utc();

    let next_run = if today_run > now {
        today_run
    } else {
        today_run + Duration::days(1)
    };

    (next_run - now).to_std().unwrap_or_default()
}
