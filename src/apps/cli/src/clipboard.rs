//! System clipboard access

use anyhow::Result;

pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> Result<()>;
}

/// `arboard` clipboard, opened on first use so a headless session can still
/// start.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardSink for SystemClipboard {
    fn copy_text(&mut self, text: &str) -> Result<()> {
        let clipboard = match self.inner.as_mut() {
            Some(clipboard) => clipboard,
            None => self.inner.insert(arboard::Clipboard::new()?),
        };
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}
