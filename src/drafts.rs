use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::utils::app_paths::AppPaths;

/// The compose fields as last typed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
}

/// Keeps the unsent post in a small JSON file
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the app data directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(AppPaths::drafts_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or unreadable drafts load as empty
    pub fn load(&self) -> Draft {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Draft::default(),
        };

        match serde_json::from_str(&content) {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Ignoring unreadable draft {}: {}", self.path.display(), e);
                Draft::default()
            }
        }
    }

    pub fn save(&self, draft: &Draft) -> Result<()> {
        let content = serde_json::to_string(draft)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write draft {}", self.path.display()))?;
        debug!("Draft saved ({} chars)", draft.title.len() + draft.body.len());
        Ok(())
    }
}
