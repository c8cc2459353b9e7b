//! Non-reentrant run guard.
//!
//! At most one run per category may be in flight. Whoever holds the
//! [`RunPermit`] owns the run; a second claim fails instead of queueing.

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Guards a single job against overlapping runs.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    slot: Arc<Mutex<()>>,
}

/// Proof that the holder owns the current run. Released on drop.
#[derive(Debug)]
pub struct RunPermit {
    _held: OwnedMutexGuard<()>,
}

impl RunGuard {
    /// Create an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the run slot, or `None` if a run is already in progress.
    pub fn try_claim(&self) -> Option<RunPermit> {
        Arc::clone(&self.slot)
            .try_lock_owned()
            .ok()
            .map(|held| RunPermit { _held: held })
    }

    /// Whether a run currently holds the slot.
    pub fn is_running(&self) -> bool {
        self.slot.try_lock().is_err()
    }

    /// Wait until no run holds the slot.
    pub async fn wait_idle(&self) {
        drop(self.slot.lock().await);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_second_claim_is_rejected() {
        let guard = RunGuard::new();
        let permit = guard.try_claim().unwrap();
        assert!(guard.is_running());
        assert!(guard.try_claim().is_none());

        drop(permit);
        assert!(!guard.is_running());
        assert!(guard.try_claim().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_idle_blocks_until_release() {
        let guard = RunGuard::new();
        let permit = guard.try_claim().unwrap();

        let waiter = {
            let guard = guard.clone();
            tokio::spawn(async move { guard.wait_idle().await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!waiter.is_finished());

        drop(permit);
        waiter.await.unwrap();
        assert!(!guard.is_running());
    }
}
