use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Where the stat CSV files live.
/// The loader only needs raw text; decoding and parsing happen above this trait.
pub trait DataSource: Send + Sync {
    /// Fetch the full text of one file
    fn fetch_text(&self, file: &str) -> Result<String>;

    /// Human readable location, for logs and the status line
    fn describe(&self) -> String;
}

/// CSV files in a local directory
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DataSource for FileDataSource {
    fn fetch_text(&self, file: &str) -> Result<String> {
        let path = self.root.join(file);
        debug!("Reading {}", path.display());
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// CSV files served over HTTP(S)
#[derive(Clone)]
pub struct HttpDataSource {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpDataSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn url_for(&self, file: &str) -> String {
        format!("{}/{}", self.base_url, file)
    }
}

impl DataSource for HttpDataSource {
    fn fetch_text(&self, file: &str) -> Result<String> {
        let url = self.url_for(file);
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Err(anyhow!("GET {} failed with status {}", url, response.status()));
        }

        Ok(response.text()?)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Pick a source for a configured location: URLs go over HTTP, anything else
/// is treated as a directory.
pub fn data_source_from_location(location: &str) -> Arc<dyn DataSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Arc::new(HttpDataSource::new(location))
    } else {
        Arc::new(FileDataSource::new(location))
    }
}
