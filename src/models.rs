use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub display_name: String,
    /// Always the output of `validation::normalize_recipient`.
    pub address: String,
    pub avatar: String,
    pub is_online: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferDetails {
    pub amount: String,
    pub token_symbol: String,
    pub transaction_hash: String,
    pub recipient: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Transfer(TransferDetails),
}

/// Progress of an outgoing message or transfer. Ordered so that a later
/// stage always compares greater than an earlier one.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    Pending = 0,   // Created locally, nothing acknowledged yet
    Sent = 1,      // Accepted by the (simulated) network
    Delivered = 2, // Reached the recipient
    Seen = 3,      // Read by the recipient
}

impl DeliveryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Seen)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::Seen => "seen",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
    pub status: DeliveryStatus,
    pub kind: MessageKind,
}

impl Message {
    /// New outgoing text message in the `Pending` state.
    pub fn text(content: &str) -> Self {
        Message {
            id: Uuid::new_v4().to_string(),
            content: content.to_string(),
            direction: Direction::Outgoing,
            created_at: Utc::now(),
            status: DeliveryStatus::Pending,
            kind: MessageKind::Text,
        }
    }

    /// New outgoing transfer record in the `Pending` state. Transfers carry no text.
    pub fn transfer(details: TransferDetails) -> Self {
        Message {
            id: Uuid::new_v4().to_string(),
            content: String::new(),
            direction: Direction::Outgoing,
            created_at: Utc::now(),
            status: DeliveryStatus::Pending,
            kind: MessageKind::Transfer(details),
        }
    }

    pub fn is_transfer(&self) -> bool {
        matches!(self.kind, MessageKind::Transfer(_))
    }

    pub fn transfer_details(&self) -> Option<&TransferDetails> {
        match &self.kind {
            MessageKind::Transfer(details) => Some(details),
            MessageKind::Text => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub name: String,
    pub last_message: String,
    /// Relative time label as displayed ("2m", "1h").
    pub timestamp: String,
    pub unread: u32,
    pub address: String,
    pub is_online: bool,
}
