//! Directory scanner for texture source folders.
//!
//! Lists the files directly inside a source directory and splits each
//! filename into stem and extension. Subdirectories are not descended into;
//! every directory is its own source.

use std::collections::BTreeSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{SlothError, Result};

/// Extension of per-directory and per-shader option files.
pub const OPTIONS_EXTENSION: &str = "sloth";

/// Stem of the per-directory option file (`options.sloth`).
pub const DEFAULT_OPTIONS_STEM: &str = "options";

/// One file in a source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub stem: String,
    /// Extension without the dot, empty if there is none.
    pub ext: String,
}

impl ListingEntry {
    /// Split a filename at its last dot, keeping dotfiles whole.
    pub fn from_file_name(name: &str) -> Self {
        let path = Path::new(name);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(name)
            .to_string();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();

        Self { stem, ext }
    }

    pub fn is_options_file(&self) -> bool {
        self.ext == OPTIONS_EXTENSION
    }
}

/// The files of a source directory, in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryListing {
    pub entries: Vec<ListingEntry>,
}

impl DirectoryListing {
    /// Build a listing from filenames.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: names
                .into_iter()
                .map(|n| ListingEntry::from_file_name(n.as_ref()))
                .collect(),
        }
    }

    /// Whether `options.sloth` is present.
    pub fn has_default_options(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.is_options_file() && e.stem == DEFAULT_OPTIONS_STEM)
    }

    /// Stems of per-name option files, excluding `options.sloth`.
    pub fn option_stems(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|e| e.is_options_file() && e.stem != DEFAULT_OPTIONS_STEM)
            .map(|e| e.stem.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// List the files directly inside a source directory, sorted by name.
///
/// A directory that can't be read is an error; individual entries that
/// vanish while listing are skipped.
pub fn scan_directory(root: &Path) -> Result<DirectoryListing> {
    if !root.is_dir() {
        return Err(SlothError::Io {
            path: root.to_path_buf(),
            message: "Not a directory".to_string(),
        });
    }

    let mut names = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(SlothError::Io {
                    path: root.to_path_buf(),
                    message: format!("Failed to list directory: {}", e),
                });
            }
            Err(_) => continue,
        };

        if !entry.file_type().is_file() {
            continue;
        }

        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }

    Ok(DirectoryListing::from_names(names))
}
