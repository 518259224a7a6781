//! Hardcoded sample data the demo starts with.

use chrono::{Duration, Utc};

use crate::models::{Contact, Conversation, DeliveryStatus, Direction, Message, MessageKind, TransferDetails};
use crate::wallet::{GasEstimates, Token, Wallet};

pub const OWN_ADDRESS: &str = "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c";

fn contact(id: &str, name: &str, address: &str, avatar: &str, is_online: bool) -> Contact {
    Contact {
        id: id.to_string(),
        display_name: name.to_string(),
        address: address.to_string(),
        avatar: avatar.to_string(),
        is_online,
    }
}

pub fn contacts() -> Vec<Contact> {
    vec![
        contact("1", "Alice Cooper", "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c", "AC", true),
        contact("2", "Bob Wilson", "bob.eth", "BW", false),
        contact("3", "Charlie Davis", "0x8ba1f109551bD432803012645Aac136c22C501e3", "CD", true),
    ]
}

fn conversation(id: &str, name: &str, last: &str, ts: &str, unread: u32, address: &str, is_online: bool) -> Conversation {
    Conversation {
        id: id.to_string(),
        name: name.to_string(),
        last_message: last.to_string(),
        timestamp: ts.to_string(),
        unread,
        address: address.to_string(),
        is_online,
    }
}

pub fn conversations() -> Vec<Conversation> {
    vec![
        conversation("1", "Alice Cooper", "Sent you 0.5 ETH", "2m", 2, "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c", true),
        conversation("2", "Bob Wilson", "Thanks for the USDC!", "1h", 0, "bob.eth", false),
        conversation("3", "Crypto Group", "New DeFi protocol launched", "3h", 5, "0x8ba1f109551bD432803012645Aac136c22C501e3", true),
    ]
}

fn seen(id: &str, content: &str, direction: Direction, minutes_ago: i64, kind: MessageKind) -> Message {
    Message {
        id: id.to_string(),
        content: content.to_string(),
        direction,
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        status: DeliveryStatus::Seen,
        kind,
    }
}

/// Opening thread of every chat. Ids are prefixed with the conversation id to stay unique.
pub fn chat_history(conversation_id: &str, contact_address: &str) -> Vec<Message> {
    let id = |n: u32| format!("{}-{}", conversation_id, n);
    vec![
        seen(&id(1), "Hey! How are you doing?", Direction::Incoming, 60, MessageKind::Text),
        seen(
            &id(2),
            "I'm doing **great**! Just sent you some ETH for the dinner we had yesterday",
            Direction::Outgoing,
            50,
            MessageKind::Text,
        ),
        seen(
            &id(3),
            "",
            Direction::Outgoing,
            48,
            MessageKind::Transfer(TransferDetails {
                amount: "0.5".to_string(),
                token_symbol: "ETH".to_string(),
                transaction_hash: "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c".to_string(),
                recipient: contact_address.to_string(),
            }),
        ),
        seen(&id(4), "Thanks! Received it. You're the _best_!", Direction::Incoming, 30, MessageKind::Text),
    ]
}

fn token(symbol: &str, name: &str, balance: f64, price: f64, change_24h: f64, balance_usd: f64, icon: &str) -> Token {
    Token {
        symbol: symbol.to_string(),
        name: name.to_string(),
        balance,
        price,
        change_24h,
        balance_usd,
        icon: icon.to_string(),
    }
}

pub fn tokens() -> Vec<Token> {
    vec![
        token("ETH", "Ethereum", 2.45, 2340.5, 3.2, 5734.23, "⟠"),
        token("USDC", "USD Coin", 1250.0, 1.0, 0.01, 1250.0, "$"),
        token("BTC", "Bitcoin", 0.15, 43250.0, -1.8, 6487.5, "₿"),
        token("LINK", "Chainlink", 0.0, 14.25, 5.7, 0.0, "⬡"),
        token("UNI", "Uniswap", 45.2, 8.75, -2.1, 395.5, "🦄"),
    ]
}

pub fn wallet() -> Wallet {
    Wallet::new(tokens(), GasEstimates::default())
}
