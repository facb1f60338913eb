use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const APP_DIR: &str = "statboard";

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Cannot determine data directory")?
            .join(APP_DIR);

        fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create {}", data_dir.display()))?;
        Ok(data_dir)
    }

    pub fn log_dir() -> Result<PathBuf> {
        let log_dir = Self::data_dir()?.join("logs");
        fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create {}", log_dir.display()))?;
        Ok(log_dir)
    }

    /// The unsent post kept between sessions
    pub fn drafts_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("draft.json"))
    }

    /// Default location for `e` exports from the TUI
    pub fn export_dir() -> Result<PathBuf> {
        let export_dir = Self::data_dir()?.join("exports");
        fs::create_dir_all(&export_dir)
            .with_context(|| format!("Failed to create {}", export_dir.display()))?;
        Ok(export_dir)
    }
}
