//! TTL Cleanup Task
//!
//! Background worker that periodically removes expired cache entries.

use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Builder;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::Store;

const THREAD_NAME: &str = "mini-memcache-cleanup";

// == Cleanup Scheduler ==
/// Handle to a running cleanup worker.
///
/// The worker owns a dedicated thread driving a single-threaded tokio
/// runtime, so callers do not need a runtime of their own.
#[derive(Debug)]
pub struct CleanupScheduler {
    token: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CleanupScheduler {
    /// Starts sweeping `store` every `interval`.
    ///
    /// The first sweep happens one full interval after start.
    ///
    /// # Errors
    /// Returns the I/O error if the timer runtime or the worker thread
    /// cannot be created.
    pub fn start<T>(store: Arc<Store<T>>, interval: Duration) -> io::Result<Self>
    where
        T: Clone + Default + Send + Sync + 'static,
    {
        let runtime = Builder::new_current_thread().enable_time().build()?;
        let token = CancellationToken::new();
        let worker_token = token.clone();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || runtime.block_on(run(store, interval, worker_token)))?;

        info!(?interval, "TTL cleanup scheduler started");

        Ok(Self {
            token,
            handle: Mutex::new(Some(handle)),
        })
    }

    // == Shutdown ==
    /// Stops the worker and waits for it to exit.
    ///
    /// Only the first call joins the worker; later or concurrent calls
    /// return immediately.
    pub fn shutdown(&self) {
        self.token.cancel();

        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                warn!("TTL cleanup worker panicked");
            }
            info!("TTL cleanup scheduler stopped");
        }
    }

    /// Returns true once shutdown has been requested.
    #[cfg(test)]
    fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

async fn run<T>(store: Arc<Store<T>>, interval: Duration, token: CancellationToken)
where
    T: Clone + Default,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = store.remove_expired();
                if removed > 0 {
                    info!("TTL cleanup: removed {} expired entries", removed);
                } else {
                    debug!("TTL cleanup: no expired entries found");
                }
            }
            _ = token.cancelled() => break,
        }
    }
}
