use chrono::{Local, NaiveDate};
use log::info;
use tokio::sync::mpsc;

use crate::error::{ActionError, ValidationError};
use crate::lifecycle::{LifecycleSimulator, StatusUpdate};
use crate::models::{Conversation, DeliveryStatus, Message, TransferDetails};
use crate::store::{MessageStore, SharedStore};
use crate::wallet::{mock_transaction_hash, parse_amount, Wallet};

/// One open conversation: its thread plus the simulator driving outgoing items.
#[derive(Clone)]
pub struct ChatSession {
    conversation: Conversation,
    simulator: LifecycleSimulator,
}

impl ChatSession {
    pub fn new(
        conversation: Conversation,
        history: Vec<Message>,
        updates: Option<mpsc::Sender<StatusUpdate>>,
    ) -> Result<Self, ActionError> {
        let store = MessageStore::with_messages(history)?;
        let mut simulator = LifecycleSimulator::new(store.into_shared());
        if let Some(tx) = updates {
            simulator = simulator.with_updates(tx);
        }
        Ok(ChatSession { conversation, simulator })
    }

    pub fn store(&self) -> SharedStore {
        self.simulator.store()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.simulator.store().lock().await.snapshot()
    }

    pub async fn send_text(&self, content: &str) -> Result<Message, ActionError> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        let message = Message::text(content);
        self.simulator.submit(message.clone()).await?;
        Ok(message)
    }

    /// In-chat transfer to the conversation's address. The amount is in token units.
    pub async fn send_transfer(&self, wallet: &Wallet, token: &str, amount: &str) -> Result<Message, ActionError> {
        if token.is_empty() || amount.trim().is_empty() {
            return Err(ValidationError::IncompleteForm.into());
        }
        if wallet.token(token).is_none() {
            return Err(ValidationError::UnknownToken(token.to_string()).into());
        }
        parse_amount(amount)?;

        let message = Message::transfer(TransferDetails {
            amount: amount.trim().to_string(),
            token_symbol: token.to_string(),
            transaction_hash: mock_transaction_hash(),
            recipient: self.conversation.address.clone(),
        });
        info!("{} {} sent to {}", amount.trim(), token, self.conversation.name);
        self.simulator.submit(message.clone()).await?;
        Ok(message)
    }

    pub async fn delete(&self, id: &str) -> Option<Message> {
        self.simulator.remove(id).await
    }
}

/// "Today", "Yesterday", or a short day-month label.
pub fn date_label(day: NaiveDate, today: NaiveDate) -> String {
    if day == today {
        "Today".to_string()
    } else if Some(day) == today.pred_opt() {
        "Yesterday".to_string()
    } else {
        day.format("%-d %b").to_string()
    }
}

/// Consecutive runs of messages sharing a local calendar day, in list order.
pub fn group_by_date(messages: &[Message], today: NaiveDate) -> Vec<(String, Vec<&Message>)> {
    let mut groups: Vec<(String, Vec<&Message>)> = Vec::new();
    for message in messages {
        let label = date_label(message.created_at.with_timezone(&Local).date_naive(), today);
        match groups.last_mut() {
            Some((current, items)) if *current == label => items.push(message),
            _ => groups.push((label, vec![message])),
        }
    }
    groups
}

pub fn status_glyph(status: DeliveryStatus) -> &'static str {
    match status {
        DeliveryStatus::Pending => "◷",
        DeliveryStatus::Sent => "✓",
        DeliveryStatus::Delivered | DeliveryStatus::Seen => "✓✓",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use std::time::Duration;

    fn session() -> ChatSession {
        let conversation = fixtures::conversations().remove(1);
        let history = fixtures::chat_history(&conversation.id, &conversation.address);
        ChatSession::new(conversation, history, None).unwrap()
    }

    #[test]
    fn test_date_labels() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(date_label(today, today), "Today");
        assert_eq!(date_label(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(), today), "Yesterday");
        assert_eq!(date_label(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), today), "1 Feb");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_text_is_rejected() {
        let chat = session();
        let before = chat.messages().await.len();
        assert_eq!(
            chat.send_text("   ").await.unwrap_err(),
            ActionError::Invalid(ValidationError::EmptyMessage)
        );
        assert_eq!(chat.messages().await.len(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_uses_contact_address_and_longer_schedule() {
        let chat = session();
        let wallet = fixtures::wallet();
        let sent = chat.send_transfer(&wallet, "USDC", "25").await.unwrap();

        let details = sent.transfer_details().unwrap();
        assert_eq!(details.recipient, "bob.eth");
        assert_eq!(details.amount, "25");
        assert!(sent.content.is_empty());

        // A text message would be seen by now; a transfer is only sent.
        tokio::time::sleep(Duration::from_millis(3500)).await;
        let status = chat.store().lock().await.get(&sent.id).map(|m| m.status);
        assert_eq!(status, Some(DeliveryStatus::Sent));
    }

    #[tokio::test(start_paused = true)]
    async fn test_transfer_form_validation() {
        let chat = session();
        let wallet = fixtures::wallet();
        assert_eq!(
            chat.send_transfer(&wallet, "", "1").await.unwrap_err(),
            ActionError::Invalid(ValidationError::IncompleteForm)
        );
        assert_eq!(
            chat.send_transfer(&wallet, "ETH", "zero").await.unwrap_err(),
            ActionError::Invalid(ValidationError::InvalidAmount("zero".to_string()))
        );
    }
}
