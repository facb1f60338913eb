//! Mapping from a selection to the CSV file that holds its stats.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    Batter,
    Pitcher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PitcherRole {
    #[default]
    Starter,
    Relief,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum League {
    AL,
    #[default]
    NL,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatMode {
    #[default]
    Classic,
    Saber,
}

impl Category {
    pub fn code(self) -> &'static str {
        match self {
            Category::Batter => "batter",
            Category::Pitcher => "pitcher",
        }
    }
}

impl PitcherRole {
    pub fn code(self) -> &'static str {
        match self {
            PitcherRole::Starter => "SP",
            PitcherRole::Relief => "RP",
        }
    }

    pub fn other(self) -> Self {
        match self {
            PitcherRole::Starter => PitcherRole::Relief,
            PitcherRole::Relief => PitcherRole::Starter,
        }
    }
}

impl League {
    pub fn code(self) -> &'static str {
        match self {
            League::AL => "AL",
            League::NL => "NL",
        }
    }

    pub fn other(self) -> Self {
        match self {
            League::AL => League::NL,
            League::NL => League::AL,
        }
    }
}

impl StatMode {
    pub fn code(self) -> &'static str {
        match self {
            StatMode::Classic => "classic",
            StatMode::Saber => "saber",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatMode::Classic => "Classic",
            StatMode::Saber => "Saber",
        }
    }

    pub fn other(self) -> Self {
        match self {
            StatMode::Classic => StatMode::Saber,
            StatMode::Saber => StatMode::Classic,
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "batter" => Ok(Category::Batter),
            "pitcher" => Ok(Category::Pitcher),
            _ => Err(anyhow!("Unknown kind '{}', expected batter or pitcher", s)),
        }
    }
}

impl FromStr for PitcherRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "SP" => Ok(PitcherRole::Starter),
            "RP" => Ok(PitcherRole::Relief),
            _ => Err(anyhow!("Unknown pitcher role '{}', expected SP or RP", s)),
        }
    }
}

impl FromStr for League {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AL" => Ok(League::AL),
            "NL" => Ok(League::NL),
            _ => Err(anyhow!("Unknown league '{}', expected AL or NL", s)),
        }
    }
}

impl FromStr for StatMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(StatMode::Classic),
            "saber" => Ok(StatMode::Saber),
            _ => Err(anyhow!("Unknown stat mode '{}', expected classic or saber", s)),
        }
    }
}

/// The four facets that pick a data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub category: Category,
    /// Only meaningful when `category` is `Pitcher`
    pub role: PitcherRole,
    pub league: League,
    pub mode: StatMode,
}

impl Selection {
    pub fn kind_label(&self) -> &'static str {
        match (self.category, self.role) {
            (Category::Batter, _) => "Batter",
            (Category::Pitcher, PitcherRole::Starter) => "Starting Pitcher",
            (Category::Pitcher, PitcherRole::Relief) => "Relief Pitcher",
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.category {
            Category::Batter => write!(
                f,
                "{}/{}/{}",
                self.category.code(),
                self.league.code(),
                self.mode.code()
            ),
            Category::Pitcher => write!(
                f,
                "{}/{}/{}/{}",
                self.category.code(),
                self.role.code(),
                self.league.code(),
                self.mode.code()
            ),
        }
    }
}

/// A selection with no entry in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingError {
    pub selection: Selection,
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No data file mapped for {}", self.selection)
    }
}

impl std::error::Error for MappingError {}

type ModeFiles = BTreeMap<String, String>;
type LeagueFiles = BTreeMap<String, ModeFiles>;

/// Nested lookup table: `batter[league][mode]` and `pitcher[role][league][mode]`.
///
/// Keys are the facet codes (`AL`, `SP`, `classic`, ...) so the table can be
/// written by hand in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCatalog {
    #[serde(default)]
    pub batter: LeagueFiles,
    #[serde(default)]
    pub pitcher: BTreeMap<String, LeagueFiles>,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        let mut batter = LeagueFiles::new();
        let mut starter = LeagueFiles::new();
        let mut relief = LeagueFiles::new();

        for league in [League::AL, League::NL] {
            let code = league.code();
            batter.insert(
                code.to_string(),
                mode_files(
                    format!("{code}_classic_full.csv"),
                    format!("{code}_saber_full.csv"),
                ),
            );
            starter.insert(
                code.to_string(),
                mode_files(
                    format!("{code}_starter_classic_full.csv"),
                    format!("{code}_starter_saber_full.csv"),
                ),
            );
            relief.insert(
                code.to_string(),
                mode_files(
                    format!("{code}_relief_classic_full.csv"),
                    format!("{code}_relief_saber_full.csv"),
                ),
            );
        }

        let mut pitcher = BTreeMap::new();
        pitcher.insert(PitcherRole::Starter.code().to_string(), starter);
        pitcher.insert(PitcherRole::Relief.code().to_string(), relief);

        Self { batter, pitcher }
    }
}

fn mode_files(classic: String, saber: String) -> ModeFiles {
    let mut files = ModeFiles::new();
    files.insert(StatMode::Classic.code().to_string(), classic);
    files.insert(StatMode::Saber.code().to_string(), saber);
    files
}

impl SourceCatalog {
    /// Resolve the file for a selection. The role is only consulted for pitchers.
    pub fn resolve(&self, selection: &Selection) -> Result<&str, MappingError> {
        let league_files = match selection.category {
            Category::Batter => Some(&self.batter),
            Category::Pitcher => self.pitcher.get(selection.role.code()),
        };

        league_files
            .and_then(|leagues| leagues.get(selection.league.code()))
            .and_then(|modes| modes.get(selection.mode.code()))
            .map(String::as_str)
            .ok_or(MappingError {
                selection: *selection,
            })
    }

    /// Every file the catalog refers to
    pub fn files(&self) -> Vec<&str> {
        let batter = self.batter.values();
        let pitcher = self.pitcher.values().flat_map(|leagues| leagues.values());
        batter
            .chain(pitcher)
            .flat_map(|modes| modes.values().map(String::as_str))
            .collect()
    }
}
