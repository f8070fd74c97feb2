//! Fixed-rate reminder check driven by a monotonic tokio timer

use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Default period between reminder checks
pub const DEFAULT_CHECK_PERIOD: Duration = Duration::from_secs(60);

/// Background task that runs a check every period until stopped
///
/// Ticks delayed by a busy runtime are not bunched up afterwards; the due
/// logic itself decides whether anything fires.
pub struct ReminderTicker {
    stop: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl ReminderTicker {
    /// Spawn the ticker; the first check runs one period from now
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stop_rx => {
                        debug!("reminder ticker stopped");
                        break;
                    }
                    _ = ticks.tick() => {
                        on_tick().await;
                    }
                }
            }
        });

        Self {
            stop: Some(stop_tx),
            handle,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Cancel the ticker and wait for the task to end
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let _ = (&mut self.handle).await;
    }
}

impl Drop for ReminderTicker {
    fn drop(&mut self) {
        if self.stop.is_some() {
            self.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_ticker(period: Duration) -> (ReminderTicker, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let ticker = ReminderTicker::spawn(period, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (ticker, count)
    }

    #[tokio::test]
    async fn test_ticks_repeatedly() {
        let (ticker, count) = counting_ticker(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(count.load(Ordering::SeqCst) >= 2);
        assert!(ticker.is_running());
        ticker.stop().await;
    }

    #[tokio::test]
    async fn test_first_tick_waits_one_period() {
        let (ticker, count) = counting_ticker(Duration::from_secs(3600));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        ticker.stop().await;
    }

    #[tokio::test]
    async fn test_stop_halts_ticks() {
        let (ticker, count) = counting_ticker(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(50)).await;
        ticker.stop().await;

        let after_stop = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }
}
