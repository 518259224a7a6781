use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex as TokioMutex;

use crate::error::StoreError;
use crate::models::{DeliveryStatus, Message};

pub type SharedStore = Arc<TokioMutex<MessageStore>>;

/// Append-only message list with O(1) lookup by id.
///
/// Insertion order is kept in `order`; `items` owns the messages. Only the
/// `status` field of a stored message can change after insertion.
#[derive(Debug, Default)]
pub struct MessageStore {
    order: Vec<String>,
    items: HashMap<String, Message>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStore {
        Arc::new(TokioMutex::new(Self::new()))
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(TokioMutex::new(self))
    }

    pub fn with_messages(messages: Vec<Message>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for message in messages {
            store.push(message)?;
        }
        Ok(store)
    }

    pub fn push(&mut self, message: Message) -> Result<(), StoreError> {
        if self.items.contains_key(&message.id) {
            return Err(StoreError::DuplicateId(message.id));
        }
        self.order.push(message.id.clone());
        self.items.insert(message.id.clone(), message);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Moves a message forward to `status`.
    ///
    /// Returns false without touching anything if the id is gone or the
    /// message is already at or past `status`.
    pub fn set_status(&mut self, id: &str, status: DeliveryStatus) -> bool {
        match self.items.get_mut(id) {
            Some(message) if message.status < status => {
                message.status = status;
                true
            }
            Some(message) => {
                debug!("Ignoring status {:?} for {}: already {:?}", status, id, message.status);
                false
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Message> {
        let removed = self.items.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> + '_ {
        self.order.iter().filter_map(move |id| self.items.get(id))
    }

    pub fn last(&self) -> Option<&Message> {
        self.order.last().and_then(|id| self.items.get(id))
    }

    /// Owned copy in insertion order, for rendering outside the lock.
    pub fn snapshot(&self) -> Vec<Message> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order_and_rejects_duplicates() {
        let mut store = MessageStore::new();
        let first = Message::text("one");
        let second = Message::text("two");
        let dup = first.clone();

        store.push(first.clone()).unwrap();
        store.push(second.clone()).unwrap();
        assert_eq!(store.push(dup), Err(StoreError::DuplicateId(first.id.clone())));

        let contents: Vec<&str> = store.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_set_status_only_moves_forward() {
        let mut store = MessageStore::new();
        let msg = Message::text("hi");
        let id = msg.id.clone();
        store.push(msg).unwrap();

        assert!(store.set_status(&id, DeliveryStatus::Delivered));
        assert!(!store.set_status(&id, DeliveryStatus::Sent));
        assert!(!store.set_status(&id, DeliveryStatus::Delivered));
        assert_eq!(store.get(&id).unwrap().status, DeliveryStatus::Delivered);
        assert_eq!(store.get(&id).unwrap().content, "hi");
    }

    #[test]
    fn test_set_status_on_missing_id_is_noop() {
        let mut store = MessageStore::new();
        assert!(!store.set_status("nope", DeliveryStatus::Sent));
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut store = MessageStore::new();
        let a = Message::text("a");
        let b = Message::text("b");
        let c = Message::text("c");
        let b_id = b.id.clone();
        for m in [a, b, c] {
            store.push(m).unwrap();
        }

        assert_eq!(store.remove(&b_id).map(|m| m.content), Some("b".to_string()));
        assert!(store.remove(&b_id).is_none());
        let snapshot: Vec<String> = store.snapshot().into_iter().map(|m| m.content).collect();
        assert_eq!(snapshot, vec!["a", "c"]);
        assert_eq!(store.last().unwrap().content, "c");
    }
}
