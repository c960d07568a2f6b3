use crate::error::{Result, ThaliError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thali_id_common::Taxonomy;

/// Environment variable that overrides `taxonomy_path`
pub const TAXONOMY_ENV: &str = "THALI_ID_TAXONOMY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cloud labels at or below this score are dropped
    pub min_score: f32,
    /// `maxResults` sent with a label-detection request
    pub max_results: u32,
    /// Predictions asked of a local classifier
    pub top_k: usize,
    pub max_candidates: usize,
    pub max_alternatives: usize,
    /// Side of the square grid an image is resized to before sampling
    pub sample_size: u32,
    pub sample_stride: usize,
    pub taxonomy_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_score: 0.65,
            max_results: 15,
            top_k: 5,
            max_candidates: 5,
            max_alternatives: 3,
            sample_size: 100,
            sample_stride: 10,
            taxonomy_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read a config file; a missing file gives the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ThaliError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("thali-id").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(ThaliError::Config(format!(
                "min_score must be within 0.0-1.0, got {}",
                self.min_score
            )));
        }
        if self.sample_size == 0 || self.sample_stride == 0 {
            return Err(ThaliError::Config(
                "sample_size and sample_stride must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn set_min_score(&mut self, min_score: f32) -> Result<()> {
        self.min_score = min_score;
        self.validate()?;
        self.save()
    }

    pub fn set_taxonomy_path(&mut self, path: PathBuf) -> Result<()> {
        self.taxonomy_path = Some(path);
        self.save()
    }

    /// Taxonomy file in effect: environment first, then the config
    pub fn effective_taxonomy_path(&self) -> Option<PathBuf> {
        match std::env::var(TAXONOMY_ENV) {
            Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => self.taxonomy_path.clone(),
        }
    }

    /// Load the configured taxonomy, or the built-in tables
    pub fn load_taxonomy(&self) -> Result<Taxonomy> {
        match self.effective_taxonomy_path() {
            Some(path) => load_taxonomy_file(&path),
            None => Ok(Taxonomy::builtin()?),
        }
    }
}

pub fn load_taxonomy_file(path: &Path) -> Result<Taxonomy> {
    if !path.exists() {
        return Err(ThaliError::FileNotFound(path.display().to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    let taxonomy = Taxonomy::from_json(&json)?;
    tracing::debug!(path = %path.display(), dishes = taxonomy.dishes().len(), "taxonomy loaded");
    Ok(taxonomy)
}
