use thiserror::Error;

/// Rejections of user input. None of these leave any state mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a name for the contact")]
    EmptyName,

    #[error("Invalid address '{0}': enter a valid ETH address or ENS name")]
    InvalidRecipient(String),

    #[error("Please complete all fields")]
    IncompleteForm,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Password does not meet all security requirements")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("An item with id {0} already exists")]
    DuplicateId(String),

    #[error("No item with id {0}")]
    UnknownId(String),
}

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("Sharing is not available")]
    Unavailable,

    #[error("Clipboard write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything a user action on the shared lists can be rejected with.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
