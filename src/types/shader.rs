//! Shader records and the texture maps they are built from.
//!
//! A `ShaderRecord` is created for every diffuse map found in a source
//! directory. It collects the companion maps, the resolved options, facts
//! read from the images and finally the keyword table that gets emitted.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use palette::Srgb;

use super::colour::LightColour;
use super::keywords::KeywordTable;
use super::options::OptionBundle;

/// Category of a texture map, identified by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapType {
    Diffuse,
    Normal,
    NormalHeight,
    Height,
    Physical,
    Specular,
    Addition,
    Preview,
}

impl MapType {
    /// All map types in association order.
    pub const ALL: [MapType; 8] = [
        MapType::Diffuse,
        MapType::Normal,
        MapType::NormalHeight,
        MapType::Height,
        MapType::Physical,
        MapType::Specular,
        MapType::Addition,
        MapType::Preview,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapType::Diffuse => "diffuse",
            MapType::Normal => "normal",
            MapType::NormalHeight => "normalheight",
            MapType::Height => "height",
            MapType::Physical => "physical",
            MapType::Specular => "specular",
            MapType::Addition => "addition",
            MapType::Preview => "preview",
        }
    }

    /// Default filename suffix.
    pub fn default_suffix(self) -> &'static str {
        match self {
            MapType::Diffuse => "_d",
            MapType::Normal => "_n",
            MapType::NormalHeight => "_nh",
            MapType::Height => "_h",
            MapType::Physical => "_phys",
            MapType::Specular => "_s",
            MapType::Addition => "_a",
            MapType::Preview => "_p",
        }
    }
}

impl fmt::Display for MapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered (map type, suffix) table used to recognise map files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suffixes {
    entries: Vec<(MapType, String)>,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            entries: MapType::ALL
                .iter()
                .map(|t| (*t, t.default_suffix().to_string()))
                .collect(),
        }
    }
}

impl Suffixes {
    /// Override the suffix for a map type.
    pub fn set(&mut self, map_type: MapType, suffix: impl Into<String>) {
        let suffix = suffix.into();
        if let Some(entry) = self.entries.iter_mut().find(|(t, _)| *t == map_type) {
            entry.1 = suffix;
        }
    }

    /// Builder-style variant of [`Suffixes::set`].
    pub fn with(mut self, map_type: MapType, suffix: impl Into<String>) -> Self {
        self.set(map_type, suffix);
        self
    }

    /// Suffix for a map type.
    pub fn get(&self, map_type: MapType) -> &str {
        self.entries
            .iter()
            .find(|(t, _)| *t == map_type)
            .map(|(_, s)| s.as_str())
            .unwrap_or_else(|| map_type.default_suffix())
    }

    pub fn iter(&self) -> impl Iterator<Item = (MapType, &str)> {
        self.entries.iter().map(|(t, s)| (*t, s.as_str()))
    }
}

/// A map file: stem plus extension, kept apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFile {
    pub stem: String,
    /// Extension without the dot, empty if the file has none.
    pub ext: String,
}

impl MapFile {
    pub fn new(stem: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            ext: ext.into(),
        }
    }

    /// The filename including extension.
    pub fn file_name(&self) -> String {
        if self.ext.is_empty() {
            self.stem.clone()
        } else {
            format!("{}.{}", self.stem, self.ext)
        }
    }
}

/// The maps associated with one shader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapSet {
    maps: BTreeMap<MapType, MapFile>,
}

impl MapSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, map_type: MapType, file: MapFile) {
        self.maps.insert(map_type, file);
    }

    pub fn get(&self, map_type: MapType) -> Option<&MapFile> {
        self.maps.get(&map_type)
    }

    /// Filename stem of a map, if present.
    pub fn stem(&self, map_type: MapType) -> Option<&str> {
        self.maps.get(&map_type).map(|m| m.stem.as_str())
    }

    pub fn has(&self, map_type: MapType) -> bool {
        self.maps.contains_key(&map_type)
    }

    /// A copy of this set without the given map.
    pub fn without(&self, map_type: MapType) -> Self {
        let mut maps = self.maps.clone();
        maps.remove(&map_type);
        Self { maps }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MapType, &MapFile)> {
        self.maps.iter().map(|(t, m)| (*t, m))
    }
}

/// Where a shader's maps live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    /// Path prefix used in the emitted script, e.g. `textures/metal_src`.
    pub rel_path: String,
    /// Directory on disk.
    pub abs_path: PathBuf,
}

impl ShaderSource {
    /// Path on disk of a map file.
    pub fn map_path(&self, file: &MapFile) -> PathBuf {
        self.abs_path.join(file.file_name())
    }

    /// Script path of a map, without extension.
    pub fn script_path(&self, file: &MapFile) -> String {
        format!("{}/{}", self.rel_path, file.stem)
    }
}

/// Facts derived from the maps and from light variant expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderMeta {
    /// The diffuse map carries a meaningful alpha channel.
    pub diffuse_alpha: bool,
    /// The diffuse alpha channel is only fully transparent or fully opaque.
    pub alpha_binary: bool,
    /// The addition map is grayscale and can be tinted.
    pub addition_grayscale: bool,
    /// Average addition map colour, channels in [0, 1].
    pub addition_colour: Option<Srgb<f32>>,
    /// Surface light intensity assigned by expansion.
    pub light_intensity: Option<u32>,
    /// Surface light colour assigned by expansion.
    pub light_colour: Option<LightColour>,
}

/// One generated shader.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderRecord {
    pub name: String,
    pub source: ShaderSource,
    pub maps: MapSet,
    pub options: OptionBundle,
    pub meta: ShaderMeta,
    pub keywords: KeywordTable,
}

impl ShaderRecord {
    pub fn new(name: impl Into<String>, source: ShaderSource, maps: MapSet, options: OptionBundle) -> Self {
        Self {
            name: name.into(),
            source,
            maps,
            options,
            meta: ShaderMeta::default(),
            keywords: KeywordTable::new(),
        }
    }

    /// Disk path of one of this shader's maps.
    pub fn map_path(&self, map_type: MapType) -> Option<PathBuf> {
        self.maps.get(map_type).map(|m| self.source.map_path(m))
    }

    /// Script path of one of this shader's maps.
    pub fn script_path(&self, map_type: MapType) -> Option<String> {
        self.maps.get(map_type).map(|m| self.source.script_path(m))
    }

    /// Source directory on disk.
    pub fn directory(&self) -> &Path {
        &self.source.abs_path
    }
}
