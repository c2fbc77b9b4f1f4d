//! Clipboard capability.
//!
//! The controller never touches the system clipboard directly; callers
//! hand it a `ClipboardWriter`. `SystemClipboard` uses arboard for
//! native access.

use crate::error::{CookerError, Result};

pub trait ClipboardWriter {
    fn write(&mut self, text: &str) -> Result<()>;
}

/// The OS clipboard. Opened per write so a missing display server only
/// fails the copy, not startup.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write(&mut self, text: &str) -> Result<()> {
        let mut clipboard =
            arboard::Clipboard::new().map_err(|e| CookerError::Clipboard(e.to_string()))?;
        clipboard
            .set_text(text)
            .map_err(|e| CookerError::Clipboard(e.to_string()))?;
        log::info!("[APP] Copied {} chars to clipboard", text.len());
        Ok(())
    }
}
