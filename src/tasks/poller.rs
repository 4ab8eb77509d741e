//! Square Status Poller
//!
//! Background task that periodically forces a connection status refresh.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::{AppStore, Outcome};

/// Spawns a task that refreshes the Square status every `interval_secs`.
///
/// Each tick forces a fresh status check regardless of how the previous one
/// ended, then sweeps expired entries out of the response cache. The task
/// stops on its own once the store shuts down.
///
/// # Returns
/// A JoinHandle the owner aborts on unmount.
///
/// # Example
/// ```ignore
/// let poller = spawn_status_poller(store.clone(), 60);
/// // Later, on unmount:
/// poller.abort();
/// ```
pub fn spawn_status_poller(store: AppStore, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting status poller with interval of {} seconds",
            interval.as_secs()
        );
        let scope = store.scope();

        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = scope.cancelled() => break,
            }

            match store.check_square_status(&scope, true).await {
                Outcome::Applied(status) => debug!("Status poll: connected={}", status.connected),
                Outcome::Failed(message) => debug!("Status poll failed: {}", message),
                Outcome::Rejected(_) | Outcome::Discarded => {}
            }

            let removed = store.client().purge_expired().await;
            if removed > 0 {
                debug!("Status poll: removed {} expired cache entries", removed);
            }
        }

        info!("Status poller stopped");
    })
}
