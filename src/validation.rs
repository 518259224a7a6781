//! Recipient normalization and password policy checks.
//!
//! Everything in here is pure: no I/O, no name resolution, no breach lookups.
//! The common-password check is a small local deny-list, not a breach corpus.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::ValidationError;

pub const ENS_SUFFIX: &str = ".eth";
pub const ADDRESS_PREFIX: &str = "0x";
pub const ADDRESS_LEN: usize = 42;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const COMMON_PASSWORDS: [&str; 10] = [
    "123456",
    "password",
    "123456789",
    "12345678",
    "12345",
    "1234567",
    "1234567890",
    "qwerty",
    "abc123",
    "password123",
];

static EVM_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("static address pattern"));

/// Turns a bare name into an ENS name by appending `.eth`.
///
/// Input that is empty, already contains a dot, or starts with `0x` is
/// returned unchanged, which makes this a fixed point on its own output.
pub fn normalize_recipient(raw: &str) -> String {
    if !raw.is_empty() && !raw.contains('.') && !raw.starts_with(ADDRESS_PREFIX) {
        return format!("{}{}", raw, ENS_SUFFIX);
    }
    raw.to_string()
}

/// Shape check only. Never verifies a checksum or resolves a name.
pub fn is_valid_recipient(normalized: &str) -> bool {
    if normalized.starts_with(ADDRESS_PREFIX) {
        return normalized.len() == ADDRESS_LEN && EVM_ADDRESS.is_match(normalized);
    }
    if normalized.ends_with(ENS_SUFFIX) {
        return normalized.len() > ENS_SUFFIX.len();
    }
    false
}

/// Normalizes and validates in one step, yielding the form that gets stored.
pub fn parse_recipient(raw: &str) -> Result<String, ValidationError> {
    let normalized = normalize_recipient(raw.trim());
    if is_valid_recipient(&normalized) {
        Ok(normalized)
    } else {
        Err(ValidationError::InvalidRecipient(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordValidation {
    pub min_length: bool,
    pub has_lowercase: bool,
    pub has_uppercase: bool,
    pub has_number: bool,
    pub has_special_char: bool,
    pub not_common: bool,
}

impl PasswordValidation {
    pub fn is_valid(&self) -> bool {
        self.checks().iter().all(|(_, ok)| *ok)
    }

    /// Checks in display order, paired with a human-readable requirement.
    pub fn checks(&self) -> [(&'static str, bool); 6] {
        [
            ("At least 8 characters", self.min_length),
            ("One lowercase letter", self.has_lowercase),
            ("One uppercase letter", self.has_uppercase),
            ("One number", self.has_number),
            ("One special character (!@#$%^&*)", self.has_special_char),
            ("Not a common password", self.not_common),
        ]
    }
}

/// Length is counted in UTF-16 code units, so an emoji counts as two.
pub fn score_password(candidate: &str) -> PasswordValidation {
    let lowered = candidate.to_lowercase();
    PasswordValidation {
        min_length: candidate.encode_utf16().count() >= MIN_PASSWORD_LEN,
        has_lowercase: candidate.chars().any(|c| c.is_ascii_lowercase()),
        has_uppercase: candidate.chars().any(|c| c.is_ascii_uppercase()),
        has_number: candidate.chars().any(|c| c.is_ascii_digit()),
        has_special_char: candidate.chars().any(|c| SPECIAL_CHARS.contains(c)),
        not_common: !COMMON_PASSWORDS.contains(&lowered.as_str()),
    }
}

pub fn passwords_match(password: &str, confirm: &str) -> bool {
    !confirm.is_empty() && password == confirm
}

/// Policy first, then the confirmation, matching the order the user is told about them.
pub fn validate_password_setup(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if !score_password(password).is_valid() {
        return Err(ValidationError::WeakPassword);
    }
    if !passwords_match(password, confirm) {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_appends_ens_suffix() {
        assert_eq!(normalize_recipient("alice"), "alice.eth");
        assert_eq!(normalize_recipient("0xabc"), "0xabc");
        assert_eq!(normalize_recipient("bob.test"), "bob.test");
        assert_eq!(normalize_recipient(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["alice", "alice.eth", "0x742d35Cc6634C0532925a3b8D4C9db96590b5b8c", "x"] {
            let once = normalize_recipient(raw);
            assert_eq!(normalize_recipient(&once), once);
        }
    }

    #[test]
    fn test_address_length_boundaries() {
        assert!(is_valid_recipient(&format!("0x{}", "a".repeat(40))));
        assert!(is_valid_recipient(&format!("0x{}", "AbC123".repeat(6) + "dEf0")));
        assert!(!is_valid_recipient(&format!("0x{}", "a".repeat(39))));
        assert!(!is_valid_recipient(&format!("0x{}", "a".repeat(41))));
        // Right length, but 'H' is not hex
        assert!(!is_valid_recipient("0x8ba1f109551bD432803012645Hac136c22C501e3"));
    }

    #[test]
    fn test_ens_boundaries() {
        assert!(is_valid_recipient("x.eth"));
        assert!(!is_valid_recipient(".eth"));
        assert!(!is_valid_recipient("bob.test"));
        assert!(!is_valid_recipient(""));
    }

    #[test]
    fn test_parse_recipient() {
        assert_eq!(parse_recipient("vitalik").unwrap(), "vitalik.eth");
        assert_eq!(parse_recipient("  bob.eth ").unwrap(), "bob.eth");
        assert_eq!(
            parse_recipient("0x123"),
            Err(ValidationError::InvalidRecipient("0x123".to_string()))
        );
    }

    #[test]
    fn test_score_password() {
        let weak = score_password("abc");
        assert!(!weak.min_length);
        assert!(weak.has_lowercase);
        assert!(!weak.has_uppercase);
        assert!(!weak.has_number);
        assert!(!weak.has_special_char);
        assert!(weak.not_common);
        assert!(!weak.is_valid());

        assert!(score_password("Passw0rd!").is_valid());

        let common = score_password("password");
        assert!(common.min_length);
        assert!(!common.not_common);

        // The deny-list compares lowercased input
        assert!(!score_password("PASSWORD123").not_common);
    }

    #[test]
    fn test_length_counts_utf16_units() {
        let emoji = score_password("Aa1!😀😀");
        assert_eq!("Aa1!😀😀".chars().count(), 6);
        assert!(emoji.min_length);
        assert!(emoji.is_valid());

        assert!(!score_password("Aa1!éé").min_length);
    }

    #[test]
    fn test_validate_password_setup() {
        assert_eq!(validate_password_setup("Passw0rd!", "Passw0rd!"), Ok(()));
        assert_eq!(validate_password_setup("weak", "weak"), Err(ValidationError::WeakPassword));
        assert_eq!(
            validate_password_setup("Passw0rd!", "Passw0rd?"),
            Err(ValidationError::PasswordMismatch)
        );
        assert_eq!(validate_password_setup("Passw0rd!", ""), Err(ValidationError::PasswordMismatch));
    }
}
