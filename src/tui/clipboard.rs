//! Clipboard abstraction layer.
//!
//! A trait keeps the app testable without a display server.

pub trait ClipboardProvider {
    /// Set text to clipboard. Returns false if no clipboard is available.
    fn set_text(&mut self, text: String) -> bool;
}

/// System clipboard implementation using arboard.
pub struct SystemClipboard;

impl ClipboardProvider for SystemClipboard {
    fn set_text(&mut self, text: String) -> bool {
        let mut cb = match arboard::Clipboard::new() {
            Ok(cb) => cb,
            Err(e) => {
                log::warn!("clipboard unavailable: {}", e);
                return false;
            }
        };
        cb.set_text(text).is_ok()
    }
}
