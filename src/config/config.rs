use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::data::source_catalog::{Selection, SourceCatalog};

pub const DEFAULT_POSTS_URL: &str =
    "https://stats-that-should-matter-more-default-rtdb.firebaseio.com/posts.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub posts: PostsConfig,
    pub defaults: DefaultsConfig,
    pub display: DisplayConfig,

    /// Replaces the built-in file mapping when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<SourceCatalog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Directory or http(s) base URL holding the CSV files
    pub base: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostsConfig {
    pub enabled: bool,
    pub url: String,
}

/// Starting selection, as the codes accepted on the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub league: String,
    pub kind: String,
    pub role: String,
    pub mode: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode arrows and bullets; ASCII otherwise
    pub use_glyphs: bool,

    /// Show the post board panel on startup
    pub show_posts: bool,

    /// Set from `use_glyphs` on load
    #[serde(skip)]
    pub icons: IconConfig,
}

#[derive(Debug, Clone)]
pub struct IconConfig {
    pub unsorted: String,
    pub ascending: String,
    pub descending: String,
    pub separator: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            base: "data".to_string(),
        }
    }
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_POSTS_URL.to_string(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            league: "NL".to_string(),
            kind: "batter".to_string(),
            role: "SP".to_string(),
            mode: "classic".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            show_posts: true,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            unsorted: "↕".to_string(),
            ascending: "↑".to_string(),
            descending: "↓".to_string(),
            separator: "•".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            unsorted: "-".to_string(),
            ascending: "^".to_string(),
            descending: "v".to_string(),
            separator: "|".to_string(),
        }
    }
}

impl DefaultsConfig {
    /// Parse the configured codes into a starting selection
    pub fn selection(&self) -> Result<Selection> {
        Ok(Selection {
            category: self.kind.parse().context("Invalid [defaults] kind")?,
            role: self.role.parse().context("Invalid [defaults] role")?,
            league: self.league.parse().context("Invalid [defaults] league")?,
            mode: self.mode.parse().context("Invalid [defaults] mode")?,
        })
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("statboard").join("config.toml"))
    }

    pub fn catalog(&self) -> SourceCatalog {
        self.catalog.clone().unwrap_or_default()
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        format!(
            r#"# statboard configuration
# Location: ~/.config/statboard/config.toml (Linux)
#           ~/Library/Application Support/statboard/config.toml (macOS)
#           %APPDATA%\statboard\config.toml (Windows)

[sources]
# Directory or http(s) base URL holding the stat CSV files
base = "data"

[posts]
# Show and submit posts on the shared board
enabled = true
url = "{}"

[defaults]
# Selection shown on startup
league = "NL"       # AL | NL
kind = "batter"     # batter | pitcher
role = "SP"         # SP | RP (pitchers only)
mode = "classic"    # classic | saber

[display]
# Unicode sort arrows and bullets; set to false for ASCII
use_glyphs = true

# Show the post board panel on startup (toggle with F2)
show_posts = true

# Uncomment to point selections at different files.
# Every combination left out shows a mapping error.
# [catalog.batter.AL]
# classic = "AL_classic_full.csv"
# saber = "AL_saber_full.csv"
#
# [catalog.pitcher.SP.AL]
# classic = "AL_starter_classic_full.csv"
# saber = "AL_starter_saber_full.csv"
"#,
            DEFAULT_POSTS_URL
        )
    }

    /// Initialize config with a setup wizard
    pub fn init_wizard() -> Result<Self> {
        println!("statboard configuration setup");
        println!("=============================");

        let mut config = Config::default();

        print!("Directory or URL with the stat CSV files [data]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().is_empty() {
            config.sources.base = input.trim().to_string();
        }

        print!("Does your terminal support Unicode arrows? (y/n) [y]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        input.clear();
        std::io::stdin().read_line(&mut input)?;
        config.display.use_glyphs = !input.trim().eq_ignore_ascii_case("n");
        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        print!("Show the post board? (y/n) [y]: ");
        std::io::Write::flush(&mut std::io::stdout())?;
        input.clear();
        std::io::stdin().read_line(&mut input)?;
        let show_posts = !input.trim().eq_ignore_ascii_case("n");
        config.posts.enabled = show_posts;
        config.display.show_posts = show_posts;

        config.save()?;

        println!("\nConfiguration saved to: {:?}", Config::get_config_path()?);
        println!("You can edit this file directly to customize further.");

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source_catalog::{Category, League, StatMode};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.display.use_glyphs);
        assert_eq!(config.sources.base, "data");
        assert_eq!(config.posts.url, DEFAULT_POSTS_URL);
        assert_eq!(config.defaults.selection().unwrap(), Selection::default());
    }

    #[test]
    fn test_commented_default_parses() {
        let config: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert!(config.posts.enabled);
        assert!(config.catalog.is_none());
    }

    #[test]
    fn test_ascii_icons_when_glyphs_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[display]\nuse_glyphs = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.display.icons.ascending, "^");
        assert!(config.display.show_posts);
    }

    #[test]
    fn test_save_and_reload_with_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.defaults.league = "AL".to_string();
        config.defaults.kind = "pitcher".to_string();
        config.defaults.mode = "saber".to_string();
        config.catalog = Some(SourceCatalog::default());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        let selection = loaded.defaults.selection().unwrap();
        assert_eq!(selection.league, League::AL);
        assert_eq!(selection.category, Category::Pitcher);
        assert_eq!(selection.mode, StatMode::Saber);
        assert_eq!(loaded.catalog(), SourceCatalog::default());
    }

    #[test]
    fn test_bad_default_is_reported() {
        let mut config = Config::default();
        config.defaults.league = "KBO".to_string();
        assert!(config.defaults.selection().is_err());
    }
}
