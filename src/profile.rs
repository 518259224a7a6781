use log::info;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::parse_recipient;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub address: String,
}

impl Profile {
    pub fn new(name: &str, description: &str, address: &str) -> Self {
        Profile {
            name: name.to_string(),
            description: description.to_string(),
            address: address.to_string(),
        }
    }

    /// Saves edits made in the profile form. The address is not editable.
    pub fn save(&mut self, name: &str, description: &str) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.name = name.to_string();
        self.description = description.trim().to_string();
        info!("Profile updated for {}", self.name);
        Ok(())
    }

    /// Address shortened for headers, e.g. `0x742d...5b8c`.
    pub fn short_address(&self) -> String {
        shorten_address(&self.address)
    }
}

pub fn shorten_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Light,
    Dark,
    Dim,
    System,
}

impl Theme {
    pub fn next(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Dim,
            Theme::Dim => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::Dim => "Dim",
            Theme::System => "System",
        }
    }
}

/// (code, native name)
pub const LANGUAGES: [(&str, &str); 10] = [
    ("es", "Español"),
    ("en", "English"),
    ("zh", "中文"),
    ("ar", "العربية"),
    ("hi", "हिन्दी"),
    ("fr", "Français"),
    ("ru", "Русский"),
    ("pt", "Português"),
    ("bn", "বাংলা"),
    ("de", "Deutsch"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    pub language: String,
    pub chat_sync: bool,
    pub notifications: bool,
    pub recovery_wallet: String,
    pub logged_in: bool,
}

impl Settings {
    pub fn new(recovery_wallet: &str) -> Self {
        Settings {
            theme: Theme::System,
            language: "es".to_string(),
            chat_sync: true,
            notifications: true,
            recovery_wallet: recovery_wallet.to_string(),
            logged_in: true,
        }
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
    }

    pub fn cycle_language(&mut self) {
        let idx = LANGUAGES
            .iter()
            .position(|(code, _)| *code == self.language)
            .map_or(0, |i| (i + 1) % LANGUAGES.len());
        self.language = LANGUAGES[idx].0.to_string();
    }

    pub fn language_name(&self) -> &'static str {
        LANGUAGES
            .iter()
            .find(|(code, _)| *code == self.language)
            .map_or("?", |(_, name)| *name)
    }

    pub fn set_recovery_wallet(&mut self, raw: &str) -> Result<&str, ValidationError> {
        self.recovery_wallet = parse_recipient(raw)?;
        info!("Recovery wallet changed to {}", self.recovery_wallet);
        Ok(&self.recovery_wallet)
    }

    /// Ends the in-memory session. The setup flag is left alone.
    pub fn logout(&mut self) {
        self.logged_in = false;
        info!("Logged out");
    }
}
