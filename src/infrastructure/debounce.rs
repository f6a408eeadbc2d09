//! Trailing-edge debouncer on the tokio runtime.
//!
//! A [`Debouncer`] delays invoking its callback until `delay` has elapsed since
//! the most recent [`Debouncer::schedule`] call; each call replaces the pending
//! arguments. It backs the free-text search entry point: every keystroke
//! reschedules, and only the final query reaches the coordinator.
//!
//! ```text
//! schedule(a) ──┐
//!   <delay ─────┤ schedule(b) aborts a's timer
//!               └── delay elapses ──▶ callback(b)
//! ```
//!
//! Dropping the debouncer aborts any pending fire.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default quiet period before a scheduled call fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

type Callback<A> = Arc<dyn Fn(A) + Send + Sync>;

pub struct Debouncer<A> {
    delay: Duration,
    callback: Arc<Mutex<Callback<A>>>,
    pending: Option<JoinHandle<()>>,
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl<A> Debouncer<A> {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Drops the pending fire, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new(delay: Duration, callback: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            callback: Arc::new(Mutex::new(Arc::new(callback))),
            pending: None,
        }
    }

    /// Replaces the callback. A pending fire invokes the new callback.
    pub fn set_callback(&self, callback: impl Fn(A) + Send + Sync + 'static) {
        *self.callback.lock() = Arc::new(callback);
    }

    /// Restarts the quiet period with `args` as the pending arguments.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, args: A) {
        self.cancel();

        let delay = self.delay;
        let slot = Arc::clone(&self.callback);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let callback = Arc::clone(&slot.lock());
            callback(args);
        }));
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) + Send + Sync + 'static) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        (fired, move |v| sink.lock().push(v))
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_call_in_burst_fires() {
        let (fired, callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(400), callback);

        debouncer.schedule(1);
        sleep(Duration::from_millis(200)).await;
        debouncer.schedule(2);
        sleep(Duration::from_millis(399)).await;
        assert!(fired.lock().is_empty());
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(10)).await;
        assert_eq!(*fired.lock(), vec![2]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_fire() {
        let (fired, callback) = recorder();
        let mut debouncer = Debouncer::new(DEFAULT_DEBOUNCE, callback);

        debouncer.schedule(7);
        debouncer.cancel();
        assert!(!debouncer.is_pending());

        sleep(Duration::from_secs(1)).await;
        assert!(fired.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn replaced_callback_handles_pending_fire() {
        let (old, old_callback) = recorder();
        let (new, new_callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(50), old_callback);

        debouncer.schedule(3);
        debouncer.set_callback(new_callback);
        sleep(Duration::from_millis(100)).await;

        assert!(old.lock().is_empty());
        assert_eq!(*new.lock(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_pending_fire() {
        let (fired, callback) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(50), callback);

        debouncer.schedule(9);
        drop(debouncer);
        sleep(Duration::from_millis(100)).await;

        assert!(fired.lock().is_empty());
    }
}
