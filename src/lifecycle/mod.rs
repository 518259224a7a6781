//! Simulated delivery progress for outgoing messages and transfers.
//!
//! Each submitted item gets one background task that walks it through
//! `Pending -> Sent -> Delivered -> Seen` at fixed offsets from creation.
//! Every step is a lookup by id in the shared store followed by a status
//! write; an id that has disappeared turns the step into a no-op.
//!
//! Tasks are tracked by id so that removing an item also cancels whatever
//! is left of its schedule.

pub mod schedule;
pub mod timer;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info, warn};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::error::StoreError;
use crate::models::{DeliveryStatus, Message};
use crate::store::SharedStore;

pub use schedule::DeliverySchedule;
pub use timer::TimerHandle;

/// Sent to the UI whenever a status change has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub id: String,
    pub status: DeliveryStatus,
}

type TimerMap = Arc<Mutex<HashMap<String, TimerHandle>>>;

#[derive(Clone)]
pub struct LifecycleSimulator {
    store: SharedStore,
    timers: TimerMap,
    updates: Option<mpsc::Sender<StatusUpdate>>,
}

fn lock_timers(timers: &TimerMap) -> MutexGuard<'_, HashMap<String, TimerHandle>> {
    timers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LifecycleSimulator {
    pub fn new(store: SharedStore) -> Self {
        LifecycleSimulator {
            store,
            timers: Arc::new(Mutex::new(HashMap::new())),
            updates: None,
        }
    }

    /// Report applied transitions on `tx`. Sending never blocks a transition.
    pub fn with_updates(mut self, tx: mpsc::Sender<StatusUpdate>) -> Self {
        self.updates = Some(tx);
        self
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Appends a freshly created item and starts its schedule.
    pub async fn submit(&self, message: Message) -> Result<String, StoreError> {
        let schedule = DeliverySchedule::for_message(&message);
        let id = message.id.clone();
        self.store.lock().await.push(message)?;
        self.advance(&id, schedule);
        Ok(id)
    }

    /// Schedules the three transitions for `id`, measured from now.
    ///
    /// A schedule already running for the same id is cancelled first.
    pub fn advance(&self, id: &str, schedule: DeliverySchedule) {
        let started = Instant::now();
        let store = self.store.clone();
        let timers = self.timers.clone();
        let updates = self.updates.clone();
        let task_id = id.to_string();

        // Hold the map while spawning so the task cannot deregister before it is registered.
        let mut guard = lock_timers(&self.timers);
        let handle = TimerHandle::spawn(async move {
            for (after, status) in schedule.steps() {
                sleep_until(started + after).await;

                let applied = store.lock().await.set_status(&task_id, status);
                if !applied {
                    debug!("Skipped {} for {}: item missing or already past it", status.label(), task_id);
                    continue;
                }
                debug!("Message {} is now {}", task_id, status.label());

                if let Some(tx) = &updates {
                    let update = StatusUpdate { id: task_id.clone(), status };
                    if let Err(e) = tx.try_send(update) {
                        warn!("Failed to notify status change for {}: {}", task_id, e);
                    }
                }
            }
            lock_timers(&timers).remove(&task_id);
        });

        if let Some(previous) = guard.insert(id.to_string(), handle) {
            previous.cancel();
        }
    }

    /// Stops the remaining transitions for `id`. Returns false if none were pending.
    pub fn cancel(&self, id: &str) -> bool {
        match lock_timers(&self.timers).remove(id) {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.cancel();
                if was_running {
                    info!("Cancelled delivery schedule for {}", id);
                }
                was_running
            }
            None => false,
        }
    }

    /// Deletes the item and cancels its schedule with it.
    pub async fn remove(&self, id: &str) -> Option<Message> {
        self.cancel(id);
        self.store.lock().await.remove(id)
    }

    /// Number of items whose schedule has not completed yet.
    pub fn in_flight(&self) -> usize {
        lock_timers(&self.timers)
            .values()
            .filter(|handle| !handle.is_finished())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MessageStore;
    use std::time::Duration;
    use tokio::time::sleep;

    async fn status_of(store: &SharedStore, id: &str) -> Option<DeliveryStatus> {
        store.lock().await.get(id).map(|m| m.status)
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_message_walks_full_schedule() {
        let store = MessageStore::shared();
        let simulator = LifecycleSimulator::new(store.clone());

        let id = simulator.submit(Message::text("hi")).await.unwrap();
        assert_eq!(status_of(&store, &id).await, Some(DeliveryStatus::Pending));

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(status_of(&store, &id).await, Some(DeliveryStatus::Sent));

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(status_of(&store, &id).await, Some(DeliveryStatus::Delivered));

        sleep(Duration::from_millis(1000)).await;
        assert_eq!(status_of(&store, &id).await, Some(DeliveryStatus::Seen));
        assert_eq!(simulator.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_remaining_transitions() {
        let store = MessageStore::shared();
        let simulator = LifecycleSimulator::new(store.clone());

        let id = simulator.submit(Message::text("hold")).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert!(simulator.cancel(&id));

        sleep(Duration::from_secs(10)).await;
        assert_eq!(status_of(&store, &id).await, Some(DeliveryStatus::Sent));
        assert!(!simulator.cancel(&id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_updates_are_reported() {
        let store = MessageStore::shared();
        let (tx, mut rx) = mpsc::channel(16);
        let simulator = LifecycleSimulator::new(store).with_updates(tx);

        let id = simulator.submit(Message::text("ping")).await.unwrap();
        sleep(Duration::from_secs(4)).await;

        let mut seen = Vec::new();
        while let Ok(update) = rx.try_recv() {
            assert_eq!(update.id, id);
            seen.push(update.status);
        }
        assert_eq!(
            seen,
            vec![DeliveryStatus::Sent, DeliveryStatus::Delivered, DeliveryStatus::Seen]
        );
    }
}
