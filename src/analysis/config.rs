//! Analyzer configuration, loaded from YAML.
//!
//! Every field is optional in the file; anything missing takes the built-in
//! default. Lookup order is an explicit path, then `paperlint.yaml` in the
//! job directory, then `~/.paperlint/config.yaml`, then the defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dsl::Difficulty;

pub const JOB_CONFIG_FILE: &str = "paperlint.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config value '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub difficulty: DifficultyConfig,
    pub duplicates: DuplicateConfig,
    pub time: TimeConfig,
    pub score: ScoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub easy_target: f64,
    pub medium_target: f64,
    pub hard_target: f64,
    pub tolerance: f64,
    /// Classify `Unknown` questions by keywords for the histogram.
    pub infer_from_text: bool,
    pub easy_keywords: Vec<String>,
    pub medium_keywords: Vec<String>,
    pub hard_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicateConfig {
    /// Jaccard similarity at or above which two questions are near-duplicates.
    pub threshold: f64,
    pub max_comparisons: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub minutes_per_mark: f64,
    pub minutes_per_word: f64,
    pub easy_factor: f64,
    pub medium_factor: f64,
    pub hard_factor: f64,
    pub unknown_factor: f64,
    pub tolerance_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub marks_penalty: u32,
    pub time_penalty: u32,
    pub difficulty_penalty: u32,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            easy_target: 0.3,
            medium_target: 0.5,
            hard_target: 0.2,
            tolerance: 0.1,
            infer_from_text: true,
            easy_keywords: words(&[
                "define", "state", "list", "identify", "name", "mention", "label", "write",
            ]),
            medium_keywords: words(&[
                "explain",
                "prove",
                "derive",
                "compare",
                "discuss",
                "describe",
                "illustrate",
                "differentiate",
                "outline",
            ]),
            hard_keywords: words(&[
                "design",
                "construct",
                "develop",
                "implement",
                "optimize",
                "synthesize",
                "analyze",
                "evaluate",
                "create",
                "formulate",
            ]),
        }
    }
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            max_comparisons: 10_000,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            minutes_per_mark: 1.5,
            minutes_per_word: 0.05,
            easy_factor: 0.75,
            medium_factor: 1.0,
            hard_factor: 1.25,
            unknown_factor: 1.0,
            tolerance_minutes: 15,
        }
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            marks_penalty: 20,
            time_penalty: 10,
            difficulty_penalty: 15,
        }
    }
}

impl DifficultyConfig {
    pub fn target(&self, level: Difficulty) -> Option<f64> {
        match level {
            Difficulty::Easy => Some(self.easy_target),
            Difficulty::Medium => Some(self.medium_target),
            Difficulty::Hard => Some(self.hard_target),
            Difficulty::Unknown => None,
        }
    }
}

impl TimeConfig {
    pub fn factor(&self, level: Difficulty) -> f64 {
        match level {
            Difficulty::Easy => self.easy_factor,
            Difficulty::Medium => self.medium_factor,
            Difficulty::Hard => self.hard_factor,
            Difficulty::Unknown => self.unknown_factor,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content, path)
    }

    /// Resolve the configuration for a run.
    ///
    /// An explicit path must exist. The job and home files are optional.
    pub fn load(explicit: Option<&Path>, job_dir: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!(path = %path.display(), "loading explicit config");
            return Self::from_file(path);
        }

        let candidates = job_dir
            .map(|dir| dir.join(JOB_CONFIG_FILE))
            .into_iter()
            .chain(home_config_path());

        for path in candidates {
            if path.is_file() {
                debug!(path = %path.display(), "loading config");
                return Self::from_file(&path);
            }
        }

        debug!("using default config");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.difficulty;
        unit_interval("difficulty.easy_target", d.easy_target)?;
        unit_interval("difficulty.medium_target", d.medium_target)?;
        unit_interval("difficulty.hard_target", d.hard_target)?;
        unit_interval("difficulty.tolerance", d.tolerance)?;
        unit_interval("duplicates.threshold", self.duplicates.threshold)?;

        let t = &self.time;
        non_negative("time.minutes_per_mark", t.minutes_per_mark)?;
        non_negative("time.minutes_per_word", t.minutes_per_word)?;
        non_negative("time.easy_factor", t.easy_factor)?;
        non_negative("time.medium_factor", t.medium_factor)?;
        non_negative("time.hard_factor", t.hard_factor)?;
        non_negative("time.unknown_factor", t.unknown_factor)?;
        Ok(())
    }
}

/// `~/.paperlint/config.yaml`
pub fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".paperlint").join("config.yaml"))
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a non-negative number"),
        })
    }
}
