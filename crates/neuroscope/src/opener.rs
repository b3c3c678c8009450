//! URL openers.

use neuroscope_core::{Result, UrlOpener};

/// Opens URLs in the system web browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebbrowserOpener;

impl UrlOpener for WebbrowserOpener {
    fn open(&self, url: &str) -> Result<()> {
        webbrowser::open(url)?;
        log::debug!("opened {url} in browser");
        Ok(())
    }
}

/// Only logs the URL. Useful on headless hosts.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOpener;

impl UrlOpener for LogOpener {
    fn open(&self, url: &str) -> Result<()> {
        log::info!("not opening {url}: no browser on this host");
        Ok(())
    }
}
