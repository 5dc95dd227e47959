//! Directory listing for the demo binary.
//!
//! Lists a directory with walkdir and exposes the entries to the canvas as
//! an [`IconSource`]: folders sort before files, names compare
//! case-insensitively, labels come from the file name.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

use iconflow::{IconSource, IntrinsicSize, ItemKey, UniformSource, ZoomLevel};

/// How far the scan reaches.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Maximum directory depth (0 = unlimited).
    pub max_depth: usize,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// List dot files.
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            recursive: false,
            max_depth: 0,
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

/// One listed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Lists `dir` (excluding `dir` itself), sorted by path.
pub fn discover(dir: &Path, config: &ScanConfig) -> Result<Vec<DirectoryEntry>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {:?}", dir);
    }

    let mut walker = WalkDir::new(dir).min_depth(1).follow_links(config.follow_symlinks);
    if !config.recursive {
        walker = walker.max_depth(1);
    } else if config.max_depth > 0 {
        walker = walker.max_depth(config.max_depth);
    }

    let include_hidden = config.include_hidden;
    let mut entries = Vec::new();
    let walk = walker
        .into_iter()
        .filter_entry(|entry| include_hidden || !is_hidden(&entry.file_name().to_string_lossy()));

    for entry in walk {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        entries.push(DirectoryEntry {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir: entry.file_type().is_dir(),
        });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(dir = ?dir, count = entries.len(), "Listed directory");
    Ok(entries)
}

/// Canvas items for a directory listing, keyed by path.
pub struct DirectorySource {
    entries: HashMap<ItemKey, DirectoryEntry>,
    metrics: UniformSource,
}

impl DirectorySource {
    pub fn new(entries: Vec<DirectoryEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (ItemKey::from(entry.path.to_string_lossy().into_owned()), entry))
            .collect();
        Self {
            entries,
            metrics: UniformSource::default(),
        }
    }

    pub fn keys(&self) -> Vec<ItemKey> {
        let mut keys: Vec<ItemKey> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn entry(&self, key: &ItemKey) -> Option<&DirectoryEntry> {
        self.entries.get(key)
    }

    pub fn scan(dir: &Path, config: &ScanConfig) -> Result<Self> {
        let entries = discover(dir, config).with_context(|| format!("Failed to list {:?}", dir))?;
        Ok(Self::new(entries))
    }
}

impl IconSource for DirectorySource {
    fn intrinsic_size(&self, key: &ItemKey, zoom: ZoomLevel, icon_size: f64) -> IntrinsicSize {
        self.metrics.intrinsic_size(key, zoom, icon_size)
    }

    fn compare(&self, a: &ItemKey, b: &ItemKey) -> Ordering {
        match (self.entries.get(a), self.entries.get(b)) {
            (Some(a), Some(b)) => b
                .is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
                .then_with(|| a.path.cmp(&b.path)),
            _ => a.cmp(b),
        }
    }

    fn uri(&self, key: &ItemKey) -> String {
        format!("file://{}", key)
    }

    fn label(&self, key: &ItemKey) -> Option<String> {
        self.entries.get(key).map(|entry| entry.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempdir().unwrap();
        let entries = discover(dir.path(), &ScanConfig::default()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_discover_skips_hidden_and_nested() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join(".hidden")).unwrap();
        let subdir = dir.path().join("photos");
        fs::create_dir(&subdir).unwrap();
        File::create(subdir.join("nested.png")).unwrap();

        let entries = discover(dir.path(), &ScanConfig::default()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["notes.txt", "photos"]);
        assert!(entries[1].is_dir);

        let config = ScanConfig {
            recursive: true,
            include_hidden: true,
            ..Default::default()
        };
        assert_eq!(discover(dir.path(), &config).unwrap().len(), 4);
    }

    #[test]
    fn test_discover_rejects_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        File::create(&file).unwrap();
        assert!(discover(&file, &ScanConfig::default()).is_err());
    }

    #[test]
    fn test_folders_sort_first() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("a.txt")).unwrap();
        File::create(dir.path().join("B.txt")).unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();

        let source = DirectorySource::scan(dir.path(), &ScanConfig::default()).unwrap();
        let mut keys = source.keys();
        keys.sort_by(|a, b| source.compare(a, b));
        let labels: Vec<String> = keys.iter().filter_map(|k| source.label(k)).collect();
        assert_eq!(labels, vec!["zeta", "a.txt", "B.txt"]);
    }
}
