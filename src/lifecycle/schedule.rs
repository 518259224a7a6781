use std::time::Duration;

use crate::models::{DeliveryStatus, Message, MessageKind};

/// Offsets, measured from creation, at which an outgoing item moves to the
/// next status. Offsets are strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliverySchedule {
    pub sent_after: Duration,
    pub delivered_after: Duration,
    pub seen_after: Duration,
}

impl DeliverySchedule {
    pub const TEXT: DeliverySchedule = DeliverySchedule {
        sent_after: Duration::from_millis(1000),
        delivered_after: Duration::from_millis(2000),
        seen_after: Duration::from_millis(3000),
    };

    // Confirmation takes longer than delivery.
    pub const TRANSFER: DeliverySchedule = DeliverySchedule {
        sent_after: Duration::from_millis(2000),
        delivered_after: Duration::from_millis(4000),
        seen_after: Duration::from_millis(6000),
    };

    pub fn for_kind(kind: &MessageKind) -> Self {
        match kind {
            MessageKind::Text => Self::TEXT,
            MessageKind::Transfer(_) => Self::TRANSFER,
        }
    }

    pub fn for_message(message: &Message) -> Self {
        Self::for_kind(&message.kind)
    }

    pub fn steps(&self) -> [(Duration, DeliveryStatus); 3] {
        [
            (self.sent_after, DeliveryStatus::Sent),
            (self.delivered_after, DeliveryStatus::Delivered),
            (self.seen_after, DeliveryStatus::Seen),
        ]
    }

    /// Status an item created `elapsed` ago should have reached.
    pub fn status_at(&self, elapsed: Duration) -> DeliveryStatus {
        self.steps()
            .iter()
            .rev()
            .find(|(after, _)| elapsed >= *after)
            .map(|(_, status)| *status)
            .unwrap_or(DeliveryStatus::Pending)
    }

    pub fn total(&self) -> Duration {
        self.seen_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransferDetails;

    #[test]
    fn test_offsets_strictly_increase() {
        for schedule in [DeliverySchedule::TEXT, DeliverySchedule::TRANSFER] {
            let steps = schedule.steps();
            assert!(steps[0].0 < steps[1].0);
            assert!(steps[1].0 < steps[2].0);
        }
    }

    #[test]
    fn test_transfer_takes_twice_as_long() {
        assert_eq!(DeliverySchedule::TRANSFER.total(), DeliverySchedule::TEXT.total() * 2);
    }

    #[test]
    fn test_status_at() {
        let s = DeliverySchedule::TEXT;
        assert_eq!(s.status_at(Duration::ZERO), DeliveryStatus::Pending);
        assert_eq!(s.status_at(Duration::from_millis(999)), DeliveryStatus::Pending);
        assert_eq!(s.status_at(Duration::from_millis(1500)), DeliveryStatus::Sent);
        assert_eq!(s.status_at(Duration::from_millis(2500)), DeliveryStatus::Delivered);
        assert_eq!(s.status_at(Duration::from_secs(60)), DeliveryStatus::Seen);
    }

    #[test]
    fn test_schedule_for_message_kind() {
        let transfer = Message::transfer(TransferDetails {
            amount: "0.5".to_string(),
            token_symbol: "ETH".to_string(),
            transaction_hash: "0xabc".to_string(),
            recipient: "bob.eth".to_string(),
        });
        assert_eq!(DeliverySchedule::for_message(&transfer), DeliverySchedule::TRANSFER);
        assert_eq!(DeliverySchedule::for_message(&Message::text("hi")), DeliverySchedule::TEXT);
    }
}
