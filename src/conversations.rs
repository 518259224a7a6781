use crate::models::{Conversation, Message, MessageKind};

#[derive(Debug, Clone, Default)]
pub struct ConversationList {
    conversations: Vec<Conversation>,
}

impl ConversationList {
    pub fn new(conversations: Vec<Conversation>) -> Self {
        ConversationList { conversations }
    }

    pub fn all(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Case-insensitive match on the conversation name.
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        let query = query.to_lowercase();
        self.conversations
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .collect()
    }

    pub fn mark_read(&mut self, id: &str) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.unread = 0;
        }
    }

    /// Refreshes the preview line after the user sent something.
    pub fn record_outgoing(&mut self, id: &str, message: &Message) {
        if let Some(conversation) = self.conversations.iter_mut().find(|c| c.id == id) {
            conversation.last_message = preview(message);
            conversation.timestamp = "now".to_string();
        }
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread).sum()
    }
}

pub fn preview(message: &Message) -> String {
    match &message.kind {
        MessageKind::Text => message.content.lines().next().unwrap_or_default().to_string(),
        MessageKind::Transfer(details) => format!("Sent {} {}", details.amount, details.token_symbol),
    }
}
