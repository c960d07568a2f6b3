//! Dataset index
//!
//! A labelled dataset keeps one folder per dish (`images/dal_makhani/…`).
//! The index maps each image file name to its folder so a known image is
//! identified without running the classifier. A file name found in more
//! than one folder says nothing about the dish and is left out.

use super::scan_folder;
use crate::error::{Result, ThaliError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use walkdir::WalkDir;

/// File name to dish folder name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetIndex {
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct IndexBuild {
    pub index: DatasetIndex,
    /// File names dropped because several folders hold them
    pub skipped: usize,
}

impl DatasetIndex {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ThaliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Dish folder for an image file name (exact match)
    pub fn lookup(&self, file_name: &str) -> Option<&str> {
        self.entries.get(file_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index every image in the dish folders directly under `root`
pub fn build_index(root: &Path) -> Result<IndexBuild> {
    if !root.is_dir() {
        return Err(ThaliError::FolderNotFound(root.display().to_string()));
    }

    let mut owners: HashMap<String, Vec<String>> = HashMap::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let dish = entry.file_name().to_string_lossy().to_string();
        let images = scan_folder(entry.path())?;
        tracing::debug!(%dish, images = images.len(), "dish folder scanned");

        for image in images {
            owners.entry(image.file_name).or_default().push(dish.clone());
        }
    }

    let total = owners.len();
    let entries: BTreeMap<String, String> = owners
        .into_iter()
        .filter_map(|(file_name, mut dishes)| {
            (dishes.len() == 1).then(|| (file_name, dishes.remove(0)))
        })
        .collect();

    let skipped = total - entries.len();
    if skipped > 0 {
        tracing::info!(skipped, "file names shared by several dish folders left out");
    }

    Ok(IndexBuild {
        index: DatasetIndex { entries },
        skipped,
    })
}
