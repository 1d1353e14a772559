//! Project manifest (sloth.yaml) parsing.
//!
//! The manifest records how a texture tree is turned into a shader file:
//! which source directories to scan, how sets are named, where the header
//! and global options live and where the output goes. Command line flags
//! take precedence over manifest values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SlothError, Result};

/// Project manifest loaded from sloth.yaml.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Manifest {
    /// Source directories, one set per directory unless `root` is given.
    pub sources: Vec<PathBuf>,

    /// Explicit set name; merges all sources into one set.
    pub root: Option<String>,

    /// Suffix stripped from source directory names when naming sets.
    pub strip: Option<String>,

    /// File whose content becomes the commented header.
    pub header: Option<PathBuf>,

    /// Output shader file; stdout if absent.
    pub output: Option<PathBuf>,

    /// Global options file applied on top of the defaults.
    pub config: Option<PathBuf>,

    /// Default renderer name.
    pub renderer: Option<String>,

    /// Extensions of files that are never treated as maps.
    pub skip_extensions: Option<Vec<String>>,
}

impl Manifest {
    /// Load manifest from a sloth.yaml file.
    ///
    /// Relative paths are resolved against the manifest's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SlothError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        let manifest = Self::parse(&content)?;
        let base = path.parent().unwrap_or(Path::new("."));

        Ok(manifest.resolved_against(base))
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| SlothError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check sloth.yaml syntax".to_string()),
        })
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };

        self.sources = self.sources.into_iter().map(resolve).collect();
        self.header = self.header.map(resolve);
        self.output = self.output.map(resolve);
        self.config = self.config.map(resolve);
        self
    }
}
