//! Clipboard integration for the cursor readout.

use crate::error::Result;
use arboard::Clipboard;

/// Put `text` on the system clipboard.
///
/// Fails when no clipboard is available, e.g. in a headless session.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text.trim())?;
    tracing::debug!("Copied {:?} to clipboard", text);
    Ok(())
}
