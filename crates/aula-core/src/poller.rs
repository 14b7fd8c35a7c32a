// ── Resource poller ──
//
// One generic polling loop parameterized by fetch operation, period,
// and unauthorized-callback, reused by every view instead of being
// reimplemented per dashboard. The fetch is awaited inside the tick
// loop, so a slow fetch can never race an overlapping duplicate; a
// cancelled poller drops any in-flight fetch before its result is
// applied.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Cadence for status-bearing dashboards (admin overview, devices).
pub const STATUS_POLL_PERIOD: Duration = Duration::from_secs(15);

/// Cadence for booking and classroom list views.
pub const LIST_POLL_PERIOD: Duration = Duration::from_secs(30);

/// Disposer for a running poller. Cancelling (explicitly via
/// [`stop`](Self::stop) or implicitly on drop) guarantees no further
/// ticks fire and no in-flight result is applied afterwards -- the
/// scoped-acquisition contract every view teardown path relies on.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
}

impl PollHandle {
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn a polling task: invoke `fetch` immediately, then once per
/// `period`, until the returned handle is stopped or dropped.
///
/// Failure policy mirrors the dashboards' needs: transient errors are
/// logged and retried on the next scheduled tick (never sooner), while
/// a [`CoreError::SessionExpired`] stops the loop and fires
/// `on_unauthorized` exactly once -- repeated ticks must not trigger
/// repeated logouts.
pub fn spawn_poller<F, Fut>(
    period: Duration,
    mut fetch: F,
    on_unauthorized: impl FnOnce() + Send + 'static,
) -> PollHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), CoreError>> + Send + 'static,
{
    let cancel = CancellationToken::new();
    let task_cancel = cancel.clone();

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        let mut on_unauthorized = Some(on_unauthorized);

        loop {
            tokio::select! {
                biased;
                () = task_cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            // Await the fetch under the cancellation token too: tearing
            // down a view must drop in-flight work, not let it land.
            let result = tokio::select! {
                biased;
                () = task_cancel.cancelled() => break,
                r = fetch() => r,
            };

            match result {
                Ok(()) => {}
                Err(CoreError::SessionExpired) => {
                    warn!("poll fetch unauthorized -- stopping poller");
                    if let Some(cb) = on_unauthorized.take() {
                        cb();
                    }
                    break;
                }
                Err(e) => {
                    // The next scheduled tick is the retry; views keep
                    // their last-known-good state meanwhile.
                    warn!(error = %e, "poll fetch failed -- retrying on next tick");
                }
            }
        }
        debug!("poller exited");
    });

    PollHandle { cancel }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Let spawned tasks run until they are all blocked on time.
    async fn settle() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_fires_immediately_then_on_period() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let handle = spawn_poller(
            Duration::from_secs(15),
            move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            || {},
        );

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "first fetch is immediate");

        tokio::time::advance(Duration::from_secs(15)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert!(count.load(Ordering::SeqCst) >= 3);

        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_fetches() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let handle = spawn_poller(
            Duration::from_secs(15),
            move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            || {},
        );

        settle().await;
        let before = count.load(Ordering::SeqCst);

        handle.stop();
        settle().await;
        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;

        assert_eq!(count.load(Ordering::SeqCst), before);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_discards_in_flight_result() {
        let applied = Arc::new(AtomicUsize::new(0));
        let a = Arc::clone(&applied);

        let handle = spawn_poller(
            Duration::from_secs(15),
            move || {
                let a = Arc::clone(&a);
                async move {
                    // Slow fetch: application only happens after the sleep.
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    a.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            || {},
        );

        // First fetch is now in flight (sleeping).
        settle().await;
        assert_eq!(applied.load(Ordering::SeqCst), 0);

        // Tear down mid-flight, then let plenty of time pass.
        handle.stop();
        settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(
            applied.load(Ordering::SeqCst),
            0,
            "in-flight result must not be applied after teardown"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_stops_loop_and_signals_once() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let signals = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fetches);
        let s = Arc::clone(&signals);

        let _handle = spawn_poller(
            Duration::from_secs(15),
            move || {
                let f = Arc::clone(&f);
                async move {
                    f.fetch_add(1, Ordering::SeqCst);
                    Err(CoreError::SessionExpired)
                }
            },
            move || {
                s.fetch_add(1, Ordering::SeqCst);
            },
        );

        settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1, "no tick after unauthorized");
        assert_eq!(signals.load(Ordering::SeqCst), 1, "signalled exactly once");
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_keep_polling() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let f = Arc::clone(&fetches);

        let handle = spawn_poller(
            Duration::from_secs(15),
            move || {
                let f = Arc::clone(&f);
                async move {
                    f.fetch_add(1, Ordering::SeqCst);
                    Err(CoreError::Unreachable {
                        reason: "connection refused".into(),
                    })
                }
            },
            || {},
        );

        settle().await;
        tokio::time::advance(Duration::from_secs(15)).await;
        settle().await;

        assert!(fetches.load(Ordering::SeqCst) >= 2, "unreachable is retried");
        handle.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_handle_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);

        let handle = spawn_poller(
            Duration::from_secs(15),
            move || {
                let c = Arc::clone(&c);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            || {},
        );

        settle().await;
        let before = count.load(Ordering::SeqCst);

        drop(handle);
        settle().await;
        tokio::time::advance(Duration::from_secs(120)).await;
        settle().await;

        assert_eq!(count.load(Ordering::SeqCst), before);
    }
}
