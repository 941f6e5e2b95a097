use std::path::{Path, PathBuf};

use ini::Ini;

use crate::error::{Error, Result};

/// Environment settings loaded from `{config_dir}/{name}.ini`.
///
/// A read failure is logged and yields an empty store; individual keys are
/// then reported missing through [`Settings::require`].
pub struct Settings {
    ini: Ini,
    path: PathBuf,
}

impl Settings {
    pub fn load(config_dir: impl AsRef<Path>, name: &str) -> Self {
        let path = config_dir.as_ref().join(format!("{name}.ini"));
        let ini = match Ini::load_from_file(&path) {
            Ok(ini) => ini,
            Err(e) => {
                tracing::error!("failed to load config {}: {e}", path.display());
                Ini::new()
            }
        };
        Self { ini, path }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.ini.get_from(Some(section), key)
    }

    pub fn require(&self, section: &str, key: &str) -> Result<&str> {
        self.get(section, key).ok_or_else(|| {
            Error::Configuration(format!(
                "missing `{key}` in [{section}] of {}",
                self.path.display()
            ))
        })
    }

    pub fn headless(&self) -> bool {
        self.get("PROD", "headless_mode")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    pub fn base_url(&self) -> Result<&str> {
        self.require("PROD", "baseURL")
    }

    /// Environment-specific subfolder of the locator repository.
    pub fn locator_folder(&self) -> Result<&str> {
        self.require("PROD", "folder")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
