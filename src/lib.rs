pub mod chat;
pub mod contacts;
pub mod conversations;
pub mod error;
pub mod fixtures;
pub mod lifecycle;
pub mod markdown;
pub mod models;
pub mod profile;
pub mod setup;
pub mod share;
pub mod store;
pub mod validation;
pub mod wallet;

// Re-export main types for convenience
pub use error::{ActionError, ShareError, StoreError, ValidationError};
pub use lifecycle::{DeliverySchedule, LifecycleSimulator, StatusUpdate};
pub use models::*;
pub use store::{MessageStore, SharedStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_status_ordering() {
        assert!(DeliveryStatus::Pending < DeliveryStatus::Sent);
        assert!(DeliveryStatus::Sent < DeliveryStatus::Delivered);
        assert!(DeliveryStatus::Delivered < DeliveryStatus::Seen);
        assert!(DeliveryStatus::Seen.is_terminal());
        assert!(!DeliveryStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_message_creation() {
        let msg = Message::text("Hello, world!");
        assert_eq!(msg.content, "Hello, world!");
        assert_eq!(msg.status, DeliveryStatus::Pending);
        assert_eq!(msg.direction, Direction::Outgoing);
        assert_eq!(msg.kind, MessageKind::Text);
        assert!(msg.transfer_details().is_none());

        // Ids are unique even for identical content
        let other = Message::text("Hello, world!");
        assert_ne!(msg.id, other.id);
    }

    #[test]
    fn test_transfer_message_has_no_content() {
        let msg = Message::transfer(TransferDetails {
            amount: "0.5".to_string(),
            token_symbol: "ETH".to_string(),
            transaction_hash: "0xabc".to_string(),
            recipient: "alice.eth".to_string(),
        });
        assert!(msg.is_transfer());
        assert!(msg.content.is_empty());
        assert_eq!(msg.transfer_details().map(|d| d.token_symbol.as_str()), Some("ETH"));
    }

    #[test]
    fn test_message_serializes_status_by_name() {
        let msg = Message::text("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"Pending\""));
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
