//! External viewer launching
//!
//! Activation opens a result's page in whatever the desktop uses for URLs.
//! Launches are fire-and-forget: failures are logged, never returned to the
//! host.

use crate::config::LauncherSettings;
use std::io;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use url::Url;

/// Opens URLs outside the provider
pub trait Launcher: Send + Sync {
    /// Start opening `url` without waiting for the viewer
    fn open(&self, url: &Url);
}

/// Launches a command with the URL as its single argument
pub struct CommandLauncher {
    command: String,
}

impl CommandLauncher {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn with_settings(settings: &LauncherSettings) -> Self {
        Self::new(settings.command.clone())
    }

    /// Spawn the viewer and reap it in the background. Works with or
    /// without a tokio runtime on the calling thread.
    fn launch(&self, url: &Url) -> io::Result<()> {
        match Handle::try_current() {
            Ok(handle) => {
                let mut child = tokio::process::Command::new(&self.command)
                    .arg(url.as_str())
                    .spawn()?;
                handle.spawn(async move {
                    if let Err(e) = child.wait().await {
                        warn!("Viewer process failed: {}", e);
                    }
                });
            }
            Err(_) => {
                let mut child = std::process::Command::new(&self.command)
                    .arg(url.as_str())
                    .spawn()?;
                std::thread::spawn(move || {
                    if let Err(e) = child.wait() {
                        warn!("Viewer process failed: {}", e);
                    }
                });
            }
        }
        Ok(())
    }
}

impl Default for CommandLauncher {
    fn default() -> Self {
        Self::with_settings(&LauncherSettings::default())
    }
}

impl Launcher for CommandLauncher {
    fn open(&self, url: &Url) {
        match self.launch(url) {
            Ok(()) => debug!("Spawned {} for {}", self.command, url),
            Err(e) => warn!("Failed to spawn {}: {}", self.command, e),
        }
    }
}

/// Parse a page URL, accepting only web URLs
pub fn web_url(raw: &str) -> Option<Url> {
    let url = Url::parse(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_url() {
        assert!(web_url("https://pixabay.com/photos/101/").is_some());
        assert!(web_url("http://pixabay.com/").is_some());
        assert!(web_url("file:///etc/passwd").is_none());
        assert!(web_url("--help").is_none());
    }

    #[tokio::test]
    async fn test_missing_command_is_not_fatal() {
        let launcher = CommandLauncher::new("pixabay-search-no-such-viewer");
        let url = web_url("https://pixabay.com/").unwrap();

        assert!(launcher.launch(&url).is_err());
        launcher.open(&url);
        tokio::task::yield_now().await;
    }

    #[tokio::test]
    async fn test_launch_inside_runtime() {
        let launcher = CommandLauncher::new("true");
        let url = web_url("https://pixabay.com/").unwrap();

        assert!(launcher.launch(&url).is_ok());
        tokio::task::yield_now().await;
    }

    #[test]
    fn test_launch_without_runtime() {
        assert!(Handle::try_current().is_err());
        let url = web_url("https://pixabay.com/").unwrap();

        assert!(CommandLauncher::new("true").launch(&url).is_ok());
        CommandLauncher::new("pixabay-search-no-such-viewer").open(&url);
    }
}
