//! Background sweeper for live sessions
//!
//! Wall-clock sessions only archive when something sweeps. This task sweeps
//! on a fixed interval so expired threats reach history without waiting
//! for the next `REPORT`. The session sits behind a single mutex shared with
//! the input loop; intake and sweep never interleave.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::Session;

pub type SharedSession = Arc<Mutex<Session>>;

/// Sweep `session` every `interval` until `cancel` fires.
///
/// Returns the number of records archived over the task's lifetime.
pub async fn run_sweeper(
    session: SharedSession,
    interval: Duration,
    cancel: CancellationToken,
) -> usize {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut archived_total = 0usize;

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("[Sweeper] Received shutdown signal");
                break;
            }
            _ = ticker.tick() => {
                let (summary, next_expiry) = {
                    let mut guard = session.lock().await;
                    let summary = guard.sweep();
                    (summary, guard.registry().next_expiry())
                };
                if !summary.is_empty() {
                    archived_total += summary.total();
                    info!(
                        high = summary.high_archived,
                        low = summary.low_archived,
                        ids = %summary.archived.join(","),
                        "[Sweeper] Archived expired threats"
                    );
                    debug!(next_expiry = ?next_expiry, "[Sweeper] Next pending expiry");
                }
            }
        }
    }

    archived_total
}
