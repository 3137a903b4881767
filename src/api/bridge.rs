//! Host capabilities used to deliver a prompt: the clipboard and a browser.

use copypasta::{ClipboardContext, ClipboardProvider};

use super::error::StoreError;

/// Somewhere prompt text can be placed for the user to paste.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), StoreError>;
}

/// Something that can show a URL to the user.
pub trait TabOpener {
    fn open_url(&self, url: &str) -> Result<(), StoreError>;
}

/// The desktop clipboard.
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, StoreError> {
        let ctx = ClipboardContext::new().map_err(|e| StoreError::Clipboard(e.to_string()))?;
        Ok(Self { ctx })
    }
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), StoreError> {
        self.ctx
            .set_contents(text.to_string())
            .map_err(|e| StoreError::Clipboard(e.to_string()))
    }
}

/// Opens URLs in the user's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemBrowser;

impl TabOpener for SystemBrowser {
    fn open_url(&self, url: &str) -> Result<(), StoreError> {
        open::that(url).map_err(|e| StoreError::Browser {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
