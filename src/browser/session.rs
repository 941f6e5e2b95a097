use std::fs;
use std::path::Path;

use fantoccini::Client;

use crate::error::Result;

/// A live WebDriver session. One per suite: created in setup, torn down with
/// [`Session::quit`] when the suite finishes.
pub struct Session {
    client: Client,
}

impl Session {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// The raw client handle. Clones share the same underlying session.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn title(&self) -> Result<String> {
        Ok(self.client.title().await?)
    }

    /// Capture a PNG of the current viewport to `path`.
    pub async fn screenshot(&self, path: &Path) -> Result<()> {
        let png = self.client.screenshot().await?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, png)?;
        tracing::info!("screenshot written to {}", path.display());
        Ok(())
    }

    /// End the WebDriver session.
    pub async fn quit(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
