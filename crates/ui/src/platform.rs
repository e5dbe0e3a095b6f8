use std::process::Command;
use std::sync::Arc;

use log::warn;

/// Hands external links (video pages) to the operating system.
pub trait LinkOpener: Send + Sync {
    fn open_url(&self, url: &str);
}

pub type LinkOpenerRef = Arc<dyn LinkOpener>;

/// Opens http(s) links in the default browser.
pub struct SystemLinkOpener;

impl LinkOpener for SystemLinkOpener {
    fn open_url(&self, url: &str) {
        let url = url.trim();
        if !is_web_link(url) {
            warn!("refusing to open non-web link {url:?}");
            return;
        }

        let spawned = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).spawn()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        } else {
            Command::new("xdg-open").arg(url).spawn()
        };
        if let Err(err) = spawned {
            warn!("could not open {url}: {err}");
        }
    }
}

/// Only absolute http(s) links leave the app.
#[must_use]
pub fn is_web_link(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")) && !url.contains(char::is_whitespace)
}
