// Wallet, share and first-run flows as the UI drives them

mod common;
use common::setup_logging;

use tempfile::tempdir;

use walletchat::contacts::ContactBook;
use walletchat::fixtures;
use walletchat::setup::{self, AppState, LocalStore, STORAGE_FILE};
use walletchat::share::{share_or_copy, NoShareSheet, Osc52Clipboard, ShareOutcome};
use walletchat::wallet::{GasLevel, SendRequest};
use walletchat::ValidationError;

fn request(recipient: &str, amount_usd: &str) -> SendRequest {
    SendRequest {
        token: "ETH".to_string(),
        recipient: recipient.to_string(),
        amount_usd: amount_usd.to_string(),
        gas_level: GasLevel::Standard,
        save_contact: true,
    }
}

#[test]
fn test_send_then_save_recipient_as_contact() {
    setup_logging();
    let mut wallet = fixtures::wallet();
    let mut book = ContactBook::new(fixtures::contacts());
    let before = book.len();

    let receipt = wallet.send(&request("dana", "2340.5")).unwrap();
    assert_eq!(receipt.recipient, "dana.eth");
    assert_eq!(receipt.amount, "1.000000");
    assert_eq!(receipt.gas_used, 25);
    assert_eq!(receipt.hash.len(), 66);
    assert!((18_000_000..19_000_000).contains(&receipt.block_number));

    if book.find_by_address(&receipt.recipient).is_none() {
        book.add(&receipt.recipient, &receipt.recipient).unwrap();
    }
    assert_eq!(book.len(), before + 1);
    assert_eq!(wallet.history().len(), 1);
}

#[test]
fn test_rejected_send_changes_nothing() {
    setup_logging();
    let mut wallet = fixtures::wallet();
    assert_eq!(wallet.send(&request("", "10")).unwrap_err(), ValidationError::IncompleteForm);
    assert!(matches!(
        wallet.send(&request("dana.test", "10")),
        Err(ValidationError::InvalidRecipient(_))
    ));
    assert!(matches!(wallet.send(&request("dana", "-1")), Err(ValidationError::InvalidAmount(_))));
    assert!(wallet.history().is_empty());
}

#[test]
fn test_receipt_link_and_share_fallback() {
    setup_logging();
    let mut wallet = fixtures::wallet();
    let receipt = wallet.send(&request("bob.eth", "100")).unwrap();

    assert_eq!(
        receipt.explorer_url("monad.xyz"),
        format!("https://explorer.monad.xyz/tx/{}", receipt.hash)
    );

    let text = receipt.share_text();
    assert!(text.starts_with(&format!("Transaction: {}", receipt.hash)));
    assert!(text.contains("Recipient: bob.eth"));

    let clipboard = Osc52Clipboard::with_writer(Vec::new());
    let outcome = share_or_copy(&NoShareSheet, &clipboard, "Receipt", &text).unwrap();
    assert_eq!(outcome, ShareOutcome::Copied);
    let written = String::from_utf8(clipboard.into_inner()).unwrap();
    assert!(written.starts_with("\x1b]52;c;"));
}

#[test]
fn test_first_run_then_completed() {
    setup_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join(STORAGE_FILE);

    let mut storage = LocalStore::open(&path).unwrap();
    assert!(!AppState::load(&storage, None).setup_completed);

    setup::mark_setup_completed(&mut storage).unwrap();
    let restarted = LocalStore::open(&path).unwrap();
    let state = AppState::load(&restarted, Some("sepolia.io"));
    assert!(state.setup_completed);
    assert_eq!(state.network, "sepolia.io");

    // Nothing but the flag is ever written
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw.as_object().map(|o| o.len()), Some(1));
}
