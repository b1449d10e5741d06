//! Level-armed request to end the current sampling cycle.
//!
//! Signal handlers only call [`DeliveryTrigger::fire`]; the orchestrator
//! rearms the trigger at the start of each cycle, so a fire is consumed by
//! exactly one cycle no matter when it lands.

use parking_lot::Mutex;
use tokio::sync::Notify;

/// What a fired trigger asks the orchestrator to do after delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// Deliver the current batch, then keep sampling (operator interrupt).
    Flush,
    /// Deliver the current batch, then exit cleanly.
    Shutdown,
}

/// Exactly one pending asynchronous request to end the current cycle.
///
/// Level-armed: once fired it stays fired until [`rearm`](Self::rearm) is
/// called. Firing is safe from any thread or task and wakes a suspended
/// [`fired`](Self::fired) wait immediately; a fire that lands before the wait
/// registers is held as a `Notify` permit, so it is never lost.
pub struct DeliveryTrigger {
    pending: Mutex<Option<TriggerKind>>,
    notify: Notify,
}

impl DeliveryTrigger {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(None),
            notify: Notify::new(),
        }
    }

    /// Fire the trigger. A pending `Flush` upgrades to `Shutdown`; a pending
    /// `Shutdown` is never downgraded.
    pub fn fire(&self, kind: TriggerKind) {
        {
            let mut pending = self.pending.lock();
            if *pending != Some(TriggerKind::Shutdown) {
                *pending = Some(kind);
            }
        }
        self.notify.notify_one();
    }

    /// Current pending request, without clearing it.
    pub fn peek(&self) -> Option<TriggerKind> {
        *self.pending.lock()
    }

    pub fn is_fired(&self) -> bool {
        self.peek().is_some()
    }

    /// Clear the pending request. Called by the orchestrator at cycle start.
    pub fn rearm(&self) {
        *self.pending.lock() = None;
    }

    /// Wait until the trigger fires, returning the pending kind.
    ///
    /// Does not clear the pending state. The trigger stays fired until
    /// rearmed, so a caller that polls again before rearm gets the same
    /// answer.
    pub async fn fired(&self) -> TriggerKind {
        loop {
            if let Some(kind) = self.peek() {
                return kind;
            }
            // A stale permit from an earlier double-fire just spins the loop
            // once more.
            self.notify.notified().await;
        }
    }
}

impl Default for DeliveryTrigger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_fire_before_wait_is_not_lost() {
        let trigger = DeliveryTrigger::new();
        trigger.fire(TriggerKind::Flush);

        let kind = tokio::time::timeout(Duration::from_secs(1), trigger.fired())
            .await
            .expect("fired() should complete immediately");
        assert_eq!(kind, TriggerKind::Flush);
    }

    #[tokio::test]
    async fn test_fire_wakes_waiting_task() {
        let trigger = Arc::new(DeliveryTrigger::new());

        let waiter = tokio::spawn({
            let trigger = Arc::clone(&trigger);
            async move { trigger.fired().await }
        });

        tokio::task::yield_now().await;
        trigger.fire(TriggerKind::Shutdown);

        let kind = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be woken")
            .unwrap();
        assert_eq!(kind, TriggerKind::Shutdown);
    }

    #[tokio::test]
    async fn test_stays_fired_until_rearmed() {
        let trigger = DeliveryTrigger::new();
        trigger.fire(TriggerKind::Flush);

        assert!(trigger.is_fired());
        assert_eq!(trigger.fired().await, TriggerKind::Flush);
        // Still armed after being observed.
        assert!(trigger.is_fired());
        assert_eq!(trigger.fired().await, TriggerKind::Flush);

        trigger.rearm();
        assert!(!trigger.is_fired());
        assert_eq!(trigger.peek(), None);
    }

    #[test]
    fn test_shutdown_wins_over_flush() {
        let trigger = DeliveryTrigger::new();
        trigger.fire(TriggerKind::Flush);
        trigger.fire(TriggerKind::Shutdown);
        assert_eq!(trigger.peek(), Some(TriggerKind::Shutdown));

        // Never downgraded back to a plain flush.
        trigger.fire(TriggerKind::Flush);
        assert_eq!(trigger.peek(), Some(TriggerKind::Shutdown));
    }

    #[test]
    fn test_rearm_allows_new_kind() {
        let trigger = DeliveryTrigger::new();
        trigger.fire(TriggerKind::Shutdown);
        trigger.rearm();
        trigger.fire(TriggerKind::Flush);
        assert_eq!(trigger.peek(), Some(TriggerKind::Flush));
    }
}
