// Recipient and password validation, exercised through the public API

mod common;
use common::setup_logging;

use walletchat::contacts::ContactBook;
use walletchat::validation::{
    is_valid_recipient, normalize_recipient, parse_recipient, passwords_match, score_password,
    validate_password_setup, COMMON_PASSWORDS,
};
use walletchat::ValidationError;

#[test]
fn test_normalize_examples() {
    setup_logging();
    assert_eq!(normalize_recipient("alice"), "alice.eth");
    assert_eq!(normalize_recipient("0xabc"), "0xabc");
    assert_eq!(normalize_recipient("bob.test"), "bob.test");
    assert_eq!(normalize_recipient(""), "");
}

#[test]
fn test_normalize_is_a_fixed_point() {
    let inputs = [
        "alice",
        "alice.eth",
        "bob.test",
        "0xabc",
        "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c",
        "x",
        "",
    ];
    for raw in inputs {
        let once = normalize_recipient(raw);
        assert_eq!(normalize_recipient(&once), once, "not idempotent for {:?}", raw);
    }
}

#[test]
fn test_recipient_validity_boundaries() {
    assert!(is_valid_recipient(&format!("0x{}", "a".repeat(40))));
    assert!(is_valid_recipient(&format!("0x{}", "AbCdEf0123".repeat(4))));
    assert!(!is_valid_recipient(&format!("0x{}", "a".repeat(39))));
    assert!(!is_valid_recipient(&format!("0x{}", "a".repeat(41))));
    assert!(!is_valid_recipient(&format!("0x{}g", "a".repeat(39))));

    assert!(is_valid_recipient("x.eth"));
    assert!(!is_valid_recipient(".eth"));
    assert!(!is_valid_recipient("bob.test"));
    assert!(!is_valid_recipient("alice"));
}

#[test]
fn test_parse_recipient_normalizes_before_validating() {
    assert_eq!(parse_recipient(" carol ").unwrap(), "carol.eth");
    assert_eq!(
        parse_recipient("bob.test"),
        Err(ValidationError::InvalidRecipient("bob.test".to_string()))
    );
}

#[test]
fn test_contacts_only_store_normalized_addresses() {
    setup_logging();
    let mut book = ContactBook::default();
    book.add("Dave", "dave").unwrap();
    book.add("Eve", "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c").unwrap();
    assert!(book.add("Mallory", "mallory.test").is_err());

    for contact in book.all() {
        assert_eq!(normalize_recipient(&contact.address), contact.address);
        assert!(is_valid_recipient(&contact.address));
    }
    assert_eq!(book.len(), 2);
}

#[test]
fn test_password_scores() {
    let weak = score_password("abc");
    assert!(!weak.min_length);
    assert!(!weak.has_uppercase);
    assert!(!weak.has_number);
    assert!(!weak.has_special_char);
    assert!(!weak.is_valid());

    let strong = score_password("Passw0rd!");
    assert!(strong.checks().iter().all(|(_, ok)| *ok));

    let common = score_password("password");
    assert!(!common.not_common);
    assert!(common.min_length);
    assert!(common.has_lowercase);
}

#[test]
fn test_deny_list_is_case_insensitive() {
    for entry in COMMON_PASSWORDS {
        assert!(!score_password(entry).not_common);
        assert!(!score_password(&entry.to_uppercase()).not_common);
    }
    assert!(score_password("Password123!").not_common);
}

#[test]
fn test_password_setup_acceptance() {
    assert!(!passwords_match("", ""));
    assert!(passwords_match("Passw0rd!", "Passw0rd!"));

    assert_eq!(validate_password_setup("Passw0rd!", "Passw0rd!"), Ok(()));
    assert_eq!(
        validate_password_setup("Passw0rd!", "Passw0rd?"),
        Err(ValidationError::PasswordMismatch)
    );
    assert_eq!(
        validate_password_setup("password", "password"),
        Err(ValidationError::WeakPassword)
    );
}
