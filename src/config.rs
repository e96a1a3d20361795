//! Pipeline configuration
//!
//! Defaults reproduce the fixed KOSIS pipeline. A JSON file can replace them
//! without touching the code.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::data::filter::KeywordFilter;
use crate::data::loader::DEFAULT_ENCODING;
use crate::summary::AggregationDirective;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "KOSIS_CONFIG";

/// Configuration file picked up from the project root when present.
pub const CONFIG_FILE_NAME: &str = "kosis-preprocess.json";

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Directory holding inputs and outputs. Relative paths resolve against
    /// the project root.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_encoding")]
    pub default_encoding: String,
    pub datasets: Vec<DatasetSpec>,
    #[serde(default)]
    pub summary: Vec<AggregationDirective>,
}

/// One source file and what to do with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: String,
    /// Source file name inside the data directory.
    pub file: String,
    /// Overrides `default_encoding` for this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Strip thousands separators and coerce text columns to numbers.
    #[serde(default)]
    pub normalize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<KeywordFilter>,
    /// Output name; written as `processed_{output}`. Datasets without one are
    /// loaded only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl DatasetSpec {
    pub fn new(name: &str, file: &str) -> Self {
        DatasetSpec {
            name: name.to_string(),
            file: file.to_string(),
            encoding: None,
            normalize: false,
            filter: None,
            output: None,
        }
    }

    /// Whether the dataset goes through cleaning and saving.
    pub fn is_cleaned(&self) -> bool {
        self.output.is_some()
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_encoding() -> String {
    DEFAULT_ENCODING.to_string()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_encoding: default_encoding(),
            datasets: vec![
                DatasetSpec {
                    normalize: true,
                    output: Some("population.csv".to_string()),
                    ..DatasetSpec::new("population", "kosis_population.csv")
                },
                DatasetSpec {
                    filter: Some(KeywordFilter::it_jobs()),
                    output: Some("employment.csv".to_string()),
                    ..DatasetSpec::new("employment", "kosis_employment.csv")
                },
                DatasetSpec::new("regional_population", "kosis_regional_population.csv"),
            ],
            summary: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Resolve the configuration for a project root: the file named by
    /// `KOSIS_CONFIG`, else `kosis-preprocess.json` in the root, else defaults.
    pub fn discover(project_root: &Path) -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let candidate = explicit.or_else(|| {
            let local = project_root.join(CONFIG_FILE_NAME);
            local.is_file().then_some(local)
        });
        match candidate {
            Some(path) => {
                info!("using configuration {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Data directory resolved against the project root.
    pub fn data_dir_in(&self, project_root: &Path) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            project_root.join(&self.data_dir)
        }
    }

    /// Encoding for a dataset, falling back to the default.
    pub fn encoding_for<'a>(&'a self, spec: &'a DatasetSpec) -> &'a str {
        spec.encoding.as_deref().unwrap_or(&self.default_encoding)
    }
}
