//! Mock wallet: fixed token balances, gas estimates and fake transaction receipts.
//!
//! Nothing here signs or broadcasts anything. `send` produces a receipt with a
//! random hash and block number so the rest of the app has something to show.

use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::{is_valid_recipient, normalize_recipient};

pub const DEFAULT_NETWORK: &str = "monad.xyz";
const BLOCK_BASE: u64 = 18_000_000;
const BLOCK_SPREAD: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub symbol: String,
    pub name: String,
    pub balance: f64,
    pub price: f64,
    pub change_24h: f64,
    pub balance_usd: f64,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GasLevel {
    Slow,
    Standard,
    Fast,
}

impl GasLevel {
    pub const ALL: [GasLevel; 3] = [GasLevel::Slow, GasLevel::Standard, GasLevel::Fast];

    pub fn label(&self) -> &'static str {
        match self {
            GasLevel::Slow => "Slow",
            GasLevel::Standard => "Standard",
            GasLevel::Fast => "Fast",
        }
    }

    pub fn next(&self) -> GasLevel {
        match self {
            GasLevel::Slow => GasLevel::Standard,
            GasLevel::Standard => GasLevel::Fast,
            GasLevel::Fast => GasLevel::Slow,
        }
    }
}

/// How a gas price compares with the network average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasTier {
    Low,
    Average,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimates {
    pub slow: u32,
    pub standard: u32,
    pub fast: u32,
    pub average: u32,
}

impl Default for GasEstimates {
    fn default() -> Self {
        GasEstimates {
            slow: 15,
            standard: 25,
            fast: 35,
            average: 25,
        }
    }
}

impl GasEstimates {
    pub fn price(&self, level: GasLevel) -> u32 {
        match level {
            GasLevel::Slow => self.slow,
            GasLevel::Standard => self.standard,
            GasLevel::Fast => self.fast,
        }
    }

    pub fn tier(&self, level: GasLevel) -> GasTier {
        let price = self.price(level);
        if price < self.average {
            GasTier::Low
        } else if price > self.average {
            GasTier::High
        } else {
            GasTier::Average
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub hash: String,
    pub amount: String,
    pub token: String,
    pub recipient: String,
    pub block_number: u64,
    pub gas_used: u32,
}

impl TransactionReceipt {
    /// Deep link into the block explorer. Reachability is not checked.
    pub fn explorer_url(&self, network: &str) -> String {
        explorer_url(network, &self.hash)
    }

    pub fn share_text(&self) -> String {
        format!(
            "Transaction: {}\nAmount: {} {}\nRecipient: {}",
            self.hash, self.amount, self.token, self.recipient
        )
    }
}

pub fn explorer_url(network: &str, hash: &str) -> String {
    format!("https://explorer.{}/tx/{}", network, hash)
}

/// `0x` followed by 64 random hex digits.
pub fn mock_transaction_hash() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    format!("0x{}", hex::encode(bytes))
}

/// Form contents of the wallet's send dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct SendRequest {
    pub token: String,
    pub recipient: String,
    pub amount_usd: String,
    pub gas_level: GasLevel,
    pub save_contact: bool,
}

/// Strictly positive, finite decimal amount.
pub fn parse_amount(raw: &str) -> Result<f64, ValidationError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ValidationError::InvalidAmount(raw.to_string())),
    }
}

#[derive(Debug, Clone)]
pub struct Wallet {
    tokens: Vec<Token>,
    gas: GasEstimates,
    history: Vec<TransactionReceipt>,
}

impl Wallet {
    pub fn new(tokens: Vec<Token>, gas: GasEstimates) -> Self {
        Wallet {
            tokens,
            gas,
            history: Vec::new(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn gas(&self) -> &GasEstimates {
        &self.gas
    }

    pub fn history(&self) -> &[TransactionReceipt] {
        &self.history
    }

    pub fn token(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn total_balance_usd(&self) -> f64 {
        self.tokens.iter().map(|t| t.balance_usd).sum()
    }

    pub fn visible_tokens(&self, hide_zero: bool) -> Vec<&Token> {
        self.tokens
            .iter()
            .filter(|t| !hide_zero || t.balance > 0.0)
            .collect()
    }

    /// Tokens that can be sent, i.e. with a non-zero balance.
    pub fn spendable_tokens(&self) -> Vec<&Token> {
        self.visible_tokens(true)
    }

    /// USD amount converted at the token's price, six decimals. "0" if either input is missing.
    pub fn token_amount_for_usd(&self, symbol: &str, amount_usd: &str) -> String {
        match (self.token(symbol), amount_usd.trim().parse::<f64>()) {
            (Some(token), Ok(usd)) if token.price > 0.0 => format!("{:.6}", usd / token.price),
            _ => "0".to_string(),
        }
    }

    pub fn send(&mut self, request: &SendRequest) -> Result<TransactionReceipt, ValidationError> {
        if request.token.is_empty() || request.recipient.trim().is_empty() || request.amount_usd.trim().is_empty() {
            return Err(ValidationError::IncompleteForm);
        }
        if self.token(&request.token).is_none() {
            return Err(ValidationError::UnknownToken(request.token.clone()));
        }
        parse_amount(&request.amount_usd)?;

        let recipient = normalize_recipient(request.recipient.trim());
        if !is_valid_recipient(&recipient) {
            return Err(ValidationError::InvalidRecipient(request.recipient.clone()));
        }

        let receipt = TransactionReceipt {
            hash: mock_transaction_hash(),
            amount: self.token_amount_for_usd(&request.token, &request.amount_usd),
            token: request.token.clone(),
            recipient,
            block_number: BLOCK_BASE + rand::thread_rng().gen_range(0..BLOCK_SPREAD),
            gas_used: self.gas.price(request.gas_level),
        };
        info!(
            "Simulated transfer of {} {} to {} ({})",
            receipt.amount, receipt.token, receipt.recipient, receipt.hash
        );
        self.history.push(receipt.clone());
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn request(token: &str, recipient: &str, amount: &str) -> SendRequest {
        SendRequest {
            token: token.to_string(),
            recipient: recipient.to_string(),
            amount_usd: amount.to_string(),
            gas_level: GasLevel::Fast,
            save_contact: false,
        }
    }

    #[test]
    fn test_balances() {
        let wallet = fixtures::wallet();
        let total = wallet.total_balance_usd();
        assert!((total - 13867.23).abs() < 1e-6);
        assert_eq!(wallet.visible_tokens(false).len(), 5);
        assert!(wallet.visible_tokens(true).iter().all(|t| t.symbol != "LINK"));
    }

    #[test]
    fn test_token_amount_for_usd() {
        let wallet = fixtures::wallet();
        assert_eq!(wallet.token_amount_for_usd("USDC", "100"), "100.000000");
        assert_eq!(wallet.token_amount_for_usd("ETH", "2340.5"), "1.000000");
        assert_eq!(wallet.token_amount_for_usd("ETH", ""), "0");
        assert_eq!(wallet.token_amount_for_usd("DOGE", "10"), "0");
    }

    #[test]
    fn test_gas_tiers() {
        let gas = GasEstimates::default();
        assert_eq!(gas.tier(GasLevel::Slow), GasTier::Low);
        assert_eq!(gas.tier(GasLevel::Standard), GasTier::Average);
        assert_eq!(gas.tier(GasLevel::Fast), GasTier::High);
        assert_eq!(GasLevel::Fast.next(), GasLevel::Slow);
    }

    #[test]
    fn test_send_produces_receipt() {
        let mut wallet = fixtures::wallet();
        let receipt = wallet.send(&request("USDC", "vitalik", "50")).unwrap();

        assert_eq!(receipt.recipient, "vitalik.eth");
        assert_eq!(receipt.amount, "50.000000");
        assert_eq!(receipt.gas_used, 35);
        assert_eq!(receipt.hash.len(), 66);
        assert!(receipt.hash.starts_with("0x"));
        assert!((BLOCK_BASE..BLOCK_BASE + BLOCK_SPREAD).contains(&receipt.block_number));
        assert_eq!(wallet.history().len(), 1);
    }

    #[test]
    fn test_send_rejects_incomplete_or_invalid_forms() {
        let mut wallet = fixtures::wallet();
        assert_eq!(wallet.send(&request("", "bob", "1")), Err(ValidationError::IncompleteForm));
        assert_eq!(wallet.send(&request("ETH", " ", "1")), Err(ValidationError::IncompleteForm));
        assert_eq!(
            wallet.send(&request("ETH", "bob", "-3")),
            Err(ValidationError::InvalidAmount("-3".to_string()))
        );
        assert_eq!(
            wallet.send(&request("ETH", "0xdead", "3")),
            Err(ValidationError::InvalidRecipient("0xdead".to_string()))
        );
        assert_eq!(
            wallet.send(&request("DOGE", "bob", "3")),
            Err(ValidationError::UnknownToken("DOGE".to_string()))
        );
        assert!(wallet.history().is_empty());
    }

    #[test]
    fn test_receipt_links_and_share_text() {
        let receipt = TransactionReceipt {
            hash: "0xfeed".to_string(),
            amount: "1.000000".to_string(),
            token: "ETH".to_string(),
            recipient: "bob.eth".to_string(),
            block_number: 18_000_001,
            gas_used: 25,
        };
        assert_eq!(receipt.explorer_url("monad.xyz"), "https://explorer.monad.xyz/tx/0xfeed");
        assert_eq!(
            receipt.share_text(),
            "Transaction: 0xfeed\nAmount: 1.000000 ETH\nRecipient: bob.eth"
        );
    }
}
