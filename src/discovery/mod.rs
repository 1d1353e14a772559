//! Source directory discovery.
//!
//! Lists texture source directories, groups their files into shaders by
//! filename suffix, and loads the optional `sloth.yaml` project manifest.
//!
//! # Example
//!
//! ```ignore
//! use sloth::discovery::{associate, scan_directory};
//! use sloth::types::Suffixes;
//!
//! let listing = scan_directory(Path::new("textures/metal_src"))?;
//! for shader in associate(&listing, &Suffixes::default(), &[]) {
//!     println!("{}", shader.name);
//! }
//! ```

mod associate;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use associate::{associate, find_companion, Association};
pub use manifest::Manifest;
pub use scanner::{
    scan_directory, DirectoryListing, ListingEntry, DEFAULT_OPTIONS_STEM, OPTIONS_EXTENSION,
};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "sloth.yaml";

/// Look for a manifest in `root`.
///
/// Returns `None` when there is no sloth.yaml; a manifest that exists but
/// can't be read or parsed is an error.
pub fn find_manifest(root: impl AsRef<Path>) -> Result<Option<Manifest>> {
    let path: PathBuf = root.as_ref().join(MANIFEST_FILENAME);

    if path.exists() {
        Manifest::load(&path).map(Some)
    } else {
        Ok(None)
    }
}

/// Set name for a source directory: `<parent>/<dir>`, minus `strip` at the end.
///
/// `textures/metal_src` with strip `_src` becomes `textures/metal`.
pub fn set_name_for(rel_path: &str, strip: Option<&str>) -> String {
    match strip.filter(|s| !s.is_empty()) {
        Some(suffix) => rel_path.strip_suffix(suffix).unwrap_or(rel_path).to_string(),
        None => rel_path.to_string(),
    }
}

/// Script path of a source directory: its parent's name and its own name.
pub fn relative_path_for(abs_path: &Path) -> String {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    match abs_path.parent() {
        Some(parent) if !name(parent).is_empty() => format!("{}/{}", name(parent), name(abs_path)),
        _ => name(abs_path),
    }
}
