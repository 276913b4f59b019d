//! Parameter file of a processing run.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;
use tube_elo::{Affiliations, RatingSystem};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read parameter file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse parameter file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid parameters: {0}")]
    Invalid(String),
}

/// One contest table, holding the contests of one group (cage) in the order
/// they happened.
#[derive(Debug, Clone, Deserialize)]
pub struct SheetConfig {
    pub name: String,
    pub path: PathBuf,
    /// Number of lines before the header line.
    #[serde(default)]
    pub header_row: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub default_rating: f64,
    pub k_factor: f64,
    pub decimals: Option<u32>,
}

impl Default for RatingConfig {
    fn default() -> RatingConfig {
        let rating_system = RatingSystem::new();
        RatingConfig {
            default_rating: rating_system.default_rating(),
            k_factor: rating_system.k_factor(),
            decimals: rating_system.decimals(),
        }
    }
}

impl RatingConfig {
    pub fn rating_system(&self) -> RatingSystem {
        RatingSystem::builder()
            .default_rating(self.default_rating)
            .k_factor(self.k_factor)
            .decimals(self.decimals)
            .build()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub subfolder_name: String,
    pub all_sheet_scores_name: String,
    pub final_elo_score_name: String,
    pub aggregate_all_pairwise_name: String,
    /// Also write the rating trajectory of every group.
    pub write_trajectories: bool,
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig {
            dir: PathBuf::from("output"),
            subfolder_name: "tube_test".to_owned(),
            all_sheet_scores_name: "all_sheet_elo_scores".to_owned(),
            final_elo_score_name: "final_elo_scores".to_owned(),
            aggregate_all_pairwise_name: "aggregate_all_pairwise".to_owned(),
            write_trajectories: true,
        }
    }
}

impl OutputConfig {
    pub fn directory(&self) -> PathBuf {
        self.dir.join(&self.subfolder_name)
    }
}

fn default_session_divider_column() -> String {
    "date".to_owned()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    pub sheets: Vec<SheetConfig>,

    /// Column whose changes mark the start of a new session.
    #[serde(default = "default_session_divider_column")]
    pub session_divider_column: String,

    /// Individuals whose original cage differs from the sheet they appear in.
    #[serde(default)]
    pub id_to_cage: BTreeMap<String, String>,

    #[serde(default)]
    pub cage_to_strain: BTreeMap<String, String>,

    #[serde(default)]
    pub rating: RatingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Params {
    /// Loads a parameter file. Relative sheet and output paths are resolved
    /// against the directory of the file.
    pub fn load(path: &Path) -> Result<Params, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut params = Params::parse(&text)?;
        if let Some(base) = path.parent() {
            params.resolve_paths(base);
        }
        Ok(params)
    }

    pub fn parse(text: &str) -> Result<Params, ConfigError> {
        let params: Params = toml::from_str(text)?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sheets.is_empty() {
            return Err(ConfigError::Invalid("no sheets configured".to_owned()));
        }

        let mut names = FxHashSet::default();
        for sheet in &self.sheets {
            // Names become part of output file names.
            if matches!(sheet.name.as_str(), "" | "." | "..")
                || sheet.name.contains(['/', '\\'])
            {
                return Err(ConfigError::Invalid(format!(
                    "sheet name {:?} cannot be used in a file name",
                    sheet.name
                )));
            }
            if !names.insert(sheet.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate sheet name {:?}",
                    sheet.name
                )));
            }
        }

        if !(self.rating.k_factor >= 0.0 && self.rating.k_factor.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "k_factor must be a non-negative number, got {}",
                self.rating.k_factor
            )));
        }
        if !self.rating.default_rating.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "default_rating must be finite, got {}",
                self.rating.default_rating
            )));
        }

        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for sheet in &mut self.sheets {
            if sheet.path.is_relative() {
                sheet.path = base.join(&sheet.path);
            }
        }
        if self.output.dir.is_relative() {
            self.output.dir = base.join(&self.output.dir);
        }
    }

    /// The sheets to process. An empty selection means all sheets, in
    /// configuration order.
    pub fn select_sheets(&self, selection: &[String]) -> Result<Vec<&SheetConfig>, ConfigError> {
        if selection.is_empty() {
            return Ok(self.sheets.iter().collect());
        }

        selection
            .iter()
            .map(|name| {
                self.sheets
                    .iter()
                    .find(|sheet| sheet.name == *name)
                    .ok_or_else(|| ConfigError::Invalid(format!("unknown sheet {name:?}")))
            })
            .collect()
    }

    pub fn affiliations(&self) -> Affiliations {
        let mut affiliations = Affiliations::new();
        for (id, cage) in &self.id_to_cage {
            affiliations.override_group(id.as_str(), cage.as_str());
        }
        for (cage, strain) in &self.cage_to_strain {
            affiliations.strain(cage.as_str(), strain.as_str());
        }
        affiliations
    }
}
