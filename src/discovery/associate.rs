//! Map association: grouping a directory's files into shaders.
//!
//! Every diffuse map defines a shader named after the diffuse stem minus the
//! diffuse suffix. Companion maps are found by appending each map type's
//! suffix to the shader name; when that file doesn't exist the name is
//! shortened one character at a time, so `rock_metal` can share `rock_n`
//! while `rock_metal_n` still wins if it exists.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{MapFile, MapSet, MapType, Suffixes};

use super::scanner::DirectoryListing;

/// A shader name and the maps found for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub name: String,
    pub maps: MapSet,
}

/// Candidate map files grouped by type.
#[derive(Debug, Default)]
struct Candidates {
    by_type: BTreeMap<MapType, BTreeSet<String>>,
    extensions: BTreeMap<String, String>,
}

impl Candidates {
    fn collect(listing: &DirectoryListing, suffixes: &Suffixes, skip_extensions: &[String]) -> Self {
        let mut candidates = Candidates::default();

        for entry in &listing.entries {
            if entry.is_options_file() || is_skipped(&entry.ext, skip_extensions) {
                continue;
            }

            for (map_type, suffix) in suffixes.iter() {
                if entry.stem.ends_with(suffix) {
                    candidates
                        .by_type
                        .entry(map_type)
                        .or_default()
                        .insert(entry.stem.clone());
                    candidates
                        .extensions
                        .insert(entry.stem.clone(), entry.ext.clone());
                }
            }
        }

        candidates
    }

    fn of_type(&self, map_type: MapType) -> Option<&BTreeSet<String>> {
        self.by_type.get(&map_type)
    }

    fn file(&self, stem: &str) -> MapFile {
        let ext = self.extensions.get(stem).cloned().unwrap_or_default();
        MapFile::new(stem, ext)
    }
}

fn is_skipped(ext: &str, skip_extensions: &[String]) -> bool {
    skip_extensions
        .iter()
        .any(|skip| skip.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Find the longest prefix of `name` that, with `suffix` appended, names a
/// candidate file.
pub fn find_companion<'a>(
    name: &str,
    suffix: &str,
    candidates: &'a BTreeSet<String>,
) -> Option<&'a String> {
    let mut ends: Vec<usize> = name
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .chain(std::iter::once(name.len()))
        .collect();
    ends.reverse();

    for end in ends {
        let stem = format!("{}{}", &name[..end], suffix);
        if let Some(found) = candidates.get(&stem) {
            return Some(found);
        }
    }

    None
}

/// Group a directory listing into shaders.
///
/// Files whose extension is in `skip_extensions` (e.g. layered source
/// formats like `xcf`) are ignored entirely, as are option files. The result
/// is sorted by shader name.
pub fn associate(
    listing: &DirectoryListing,
    suffixes: &Suffixes,
    skip_extensions: &[String],
) -> Vec<Association> {
    let candidates = Candidates::collect(listing, suffixes, skip_extensions);
    let diffuse_suffix = suffixes.get(MapType::Diffuse);

    let Some(diffuse_maps) = candidates.of_type(MapType::Diffuse) else {
        return Vec::new();
    };

    let mut associations = Vec::new();

    for diffuse in diffuse_maps {
        let name = diffuse.strip_suffix(diffuse_suffix).unwrap_or(diffuse);
        if name.is_empty() {
            continue;
        }

        let mut maps = MapSet::new();
        maps.insert(MapType::Diffuse, candidates.file(diffuse));

        for (map_type, suffix) in suffixes.iter() {
            if map_type == MapType::Diffuse {
                continue;
            }

            let found = candidates
                .of_type(map_type)
                .and_then(|stems| find_companion(name, suffix, stems));

            if let Some(stem) = found {
                maps.insert(map_type, candidates.file(stem));
            }
        }

        associations.push(Association {
            name: name.to_string(),
            maps,
        });
    }

    associations
}
