//! Clipboard and share-sheet access, both best effort.
//!
//! A terminal has no native share sheet, so the shell uses `NoShareSheet` and
//! every share falls back to copying the text. The clipboard is reached with an
//! OSC 52 escape sequence, which most terminal emulators honour.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use log::debug;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::error::ShareError;

pub trait ShareTarget {
    fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

pub trait Clipboard {
    fn copy(&self, text: &str) -> Result<(), ShareError>;
}

pub struct NoShareSheet;

impl ShareTarget for NoShareSheet {
    fn share(&self, _title: &str, _text: &str) -> Result<(), ShareError> {
        Err(ShareError::Unavailable)
    }
}

pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

pub struct Osc52Clipboard<W: Write + Send> {
    out: Mutex<W>,
}

impl Osc52Clipboard<io::Stdout> {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write + Send> Osc52Clipboard<W> {
    pub fn with_writer(out: W) -> Self {
        Osc52Clipboard { out: Mutex::new(out) }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> Clipboard for Osc52Clipboard<W> {
    fn copy(&self, text: &str) -> Result<(), ShareError> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()?;
        debug!("Copied {} bytes to clipboard", text.len());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareOutcome {
    Shared,
    Copied,
}

/// Shares `text` if possible, otherwise copies it.
pub fn share_or_copy(
    target: &dyn ShareTarget,
    clipboard: &dyn Clipboard,
    title: &str,
    text: &str,
) -> Result<ShareOutcome, ShareError> {
    match target.share(title, text) {
        Ok(()) => Ok(ShareOutcome::Shared),
        Err(ShareError::Unavailable) => {
            clipboard.copy(text)?;
            Ok(ShareOutcome::Copied)
        }
        Err(e) => Err(e),
    }
}
