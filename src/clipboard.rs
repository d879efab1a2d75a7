//! Clipboard copy with automatic clear
//!
//! A copied secret is cleared after a timeout, but only if the clipboard
//! still holds that secret. Anything the user copied in the meantime is left
//! alone.
//!
//! On X11 and Wayland the clipboard contents are served by the owning
//! process, so the command stays in the foreground until the clear runs.

use std::thread;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::error::{VaultError, VaultResult};

/// Minimal clipboard access, implemented by the system clipboard and by
/// in-memory fakes
pub trait ClipboardBackend {
    /// Replace the clipboard contents
    fn set_text(&mut self, text: &str) -> VaultResult<()>;

    /// Current text contents, `None` when the clipboard holds no text
    fn get_text(&mut self) -> VaultResult<Option<Zeroizing<String>>>;

    /// Empty the clipboard
    fn clear(&mut self) -> VaultResult<()>;
}

/// The desktop clipboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connect to the desktop clipboard
    pub fn new() -> VaultResult<Self> {
        let inner = arboard::Clipboard::new().map_err(clipboard_error)?;
        Ok(Self { inner })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn set_text(&mut self, text: &str) -> VaultResult<()> {
        self.inner.set_text(text).map_err(clipboard_error)
    }

    fn get_text(&mut self) -> VaultResult<Option<Zeroizing<String>>> {
        match self.inner.get_text() {
            Ok(text) => Ok(Some(Zeroizing::new(text))),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(clipboard_error(e)),
        }
    }

    fn clear(&mut self) -> VaultResult<()> {
        self.inner.clear().map_err(clipboard_error)
    }
}

fn clipboard_error(err: arboard::Error) -> VaultError {
    VaultError::Clipboard(err.to_string())
}

/// What happened to a copied secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The secret was removed from the clipboard
    Cleared,
    /// The clipboard had been overwritten; nothing was touched
    Replaced,
    /// Auto-clear is disabled
    Kept,
}

/// Copy `secret` and clear it again after `clear_after`.
///
/// A zero duration disables the clear. Blocks for the whole timeout.
pub fn copy_with_auto_clear<C: ClipboardBackend>(
    clipboard: &mut C,
    secret: &str,
    clear_after: Duration,
) -> VaultResult<ClearOutcome> {
    clipboard.set_text(secret)?;

    if clear_after.is_zero() {
        return Ok(ClearOutcome::Kept);
    }

    thread::sleep(clear_after);
    clear_if_unchanged(clipboard, secret)
}

/// Clear the clipboard if it still holds `secret`
pub fn clear_if_unchanged<C: ClipboardBackend>(
    clipboard: &mut C,
    secret: &str,
) -> VaultResult<ClearOutcome> {
    match clipboard.get_text()? {
        Some(current) if current.as_str() == secret => {
            clipboard.clear()?;
            Ok(ClearOutcome::Cleared)
        }
        _ => Ok(ClearOutcome::Replaced),
    }
}
