//! Persisted user preferences.
//!
//! The only remembered state is the directory file dialogs start in. It is
//! stored as JSON in the user's config directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PlacardError, Result};

const APP_DIR: &str = "placard";
const PREFS_FILE: &str = "prefs.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Where file dialogs open.
    pub default_directory: Option<PathBuf>,
}

impl Preferences {
    /// Fresh preferences: dialogs start on the desktop when there is one.
    pub fn initial() -> Self {
        let desktop = dirs_next::desktop_dir()
            .or_else(|| dirs_next::home_dir().map(|home| home.join("Desktop")))
            .filter(|dir| dir.is_dir());
        Self {
            default_directory: desktop,
        }
    }

    /// `<config dir>/placard/prefs.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
    }

    /// Read preferences from `path`; a missing file yields [`initial`](Self::initial).
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                let msg = format!("bad preferences file {}: {}", path.display(), e);
                PlacardError::invalid_argument(msg)
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::initial()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load from the default location, falling back to fresh preferences.
    pub fn load_or_initial() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::initial();
        };
        Self::load(&path).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable preferences");
            Self::initial()
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|e| PlacardError::Io(e.into()))?;
        fs::write(path, text)?;
        debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Remember the directory containing `file`.
    pub fn remember_file(&mut self, file: &Path) {
        if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.default_directory = Some(parent.to_path_buf());
        }
    }
}
