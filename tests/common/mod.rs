// Shared helpers for the integration tests
#![allow(dead_code)]

use std::sync::Once;

use anyhow::Result;
use log::{info, LevelFilter};
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use walletchat::{DeliveryStatus, Message, MessageStore, SharedStore, StatusUpdate};

static INIT_LOGGER: Once = Once::new();

/// Set up the logger for the tests
pub fn setup_logging() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::new()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

pub fn empty_store() -> SharedStore {
    MessageStore::shared()
}

pub async fn status_of(store: &SharedStore, id: &str) -> Option<DeliveryStatus> {
    store.lock().await.get(id).map(|m| m.status)
}

pub async fn snapshot(store: &SharedStore) -> Vec<Message> {
    store.lock().await.snapshot()
}

/// Wait until `id` is reported at `status`, skipping other updates.
pub async fn wait_for_status(
    rx: &mut mpsc::Receiver<StatusUpdate>,
    id: &str,
    status: DeliveryStatus,
    timeout_secs: u64,
) -> Result<StatusUpdate> {
    info!("Waiting for {} to become {:?}", id, status);
    match timeout(Duration::from_secs(timeout_secs), async {
        while let Some(update) = rx.recv().await {
            if update.id == id && update.status == status {
                return Ok(update);
            }
        }
        Err(anyhow::anyhow!("Status channel closed"))
    })
    .await
    {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!("Timed out waiting for {:?}", status)),
    }
}
