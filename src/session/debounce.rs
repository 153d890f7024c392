//! Trailing-edge debouncer for config pushes.
//!
//! Owned by a controller instance, one timer slot per role key. Re-arming a
//! key cancels its pending timer; keys never cancel each other. Once the
//! quiet period elapses the action is detached onto the runtime, so a later
//! edit cannot cancel a push that has already fired.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct Debouncer<K> {
    delay: Duration,
    pending: HashMap<K, JoinHandle<()>>,
}

impl<K: Eq + Hash> Debouncer<K> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: HashMap::new(),
        }
    }

    /// Arm (or re-arm) the timer for `key`; `action` runs after one full
    /// quiet period with no further `schedule` calls for the same key.
    pub fn schedule<F>(&mut self, key: K, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Timer fired: from here on the action is no longer cancelable.
            tokio::spawn(action);
        });
        if let Some(previous) = self.pending.insert(key, handle) {
            previous.abort();
        }
    }

    /// Cancel the pending timer for `key`, if any.
    pub fn cancel(&mut self, key: &K) {
        if let Some(handle) = self.pending.remove(key) {
            handle.abort();
        }
    }
}

impl<K> Drop for Debouncer<K> {
    fn drop(&mut self) {
        for handle in self.pending.values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_action(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn rapid_reschedules_fire_once() {
        let mut debouncer = Debouncer::new(Duration::from_millis(20));
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            debouncer.schedule("role", counting_action(&fired));
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tokio::time::sleep(Duration::from_millis(60)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_fire_independently() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("a", counting_action(&fired));
        debouncer.schedule("b", counting_action(&fired));
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cancel_prevents_firing() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        let fired = Arc::new(AtomicUsize::new(0));

        debouncer.schedule("a", counting_action(&fired));
        debouncer.cancel(&"a");
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn drop_aborts_pending_timers() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut debouncer = Debouncer::new(Duration::from_millis(10));
            debouncer.schedule("a", counting_action(&fired));
        }
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
