//! Option overlays.
//!
//! Options are layered from least to most specific:
//!
//! 1. the generator defaults (command line and global config file),
//! 2. the directory's `options.sloth`,
//! 3. every `<prefix>.sloth` whose name is a prefix of the shader name,
//!    shortest prefix first, so the exact shader name is applied last.
//!
//! Each option file is compiled once into an [`OptionOverlay`]; invalid
//! values are reported at that point and dropped, so applying the overlay to
//! many shaders doesn't repeat the same complaint.

mod compile;

use std::collections::BTreeMap;
use std::path::Path;

use crate::diagnostics::{Diagnostic, Diagnostics, Kind};
use crate::discovery::{DirectoryListing, DEFAULT_OPTIONS_STEM, OPTIONS_EXTENSION};
use crate::error::SlothError;
use crate::parser::SlothFile;
use crate::types::{AlphaTest, KeywordValue, LightColour, OptionBundle, Renderer};

pub use compile::compile;

/// Which keyword section an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordSection {
    /// `[keywords]`
    Replace,
    /// `[addKeywords]`
    Add,
    /// `[delKeywords]`
    Delete,
}

impl KeywordSection {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "keywords" => Some(KeywordSection::Replace),
            "addKeywords" => Some(KeywordSection::Add),
            "delKeywords" => Some(KeywordSection::Delete),
            _ => None,
        }
    }
}

/// One validated change to an option bundle.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionChange {
    /// `colors` (replace) / `addColors`
    Colours {
        replace: bool,
        colours: Vec<(String, LightColour)>,
    },
    /// `customLights` / `predefLights` and their `add*` forms
    Lights {
        custom: bool,
        replace: bool,
        intensities: Vec<u32>,
    },
    ColourBlendExp(f64),
    AlphaTest(Option<AlphaTest>),
    AlphaShadows(bool),
    HeightNormalsMod(f64),
    Renderer(Renderer),
    GuessKeywords(bool),
    PrecalcColours(bool),
    EditorOpacity(Option<f64>),
    Keyword {
        section: KeywordSection,
        key: String,
        value: KeywordValue,
    },
}

/// A compiled option file.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionOverlay {
    /// Where the overlay came from, used in messages.
    pub origin: String,
    pub changes: Vec<OptionChange>,
}

impl OptionOverlay {
    /// Read, parse and compile an option file.
    ///
    /// An unreadable or syntactically broken file is reported and yields
    /// `None`; the caller carries on without it.
    pub fn load(path: &Path, diagnostics: &mut Diagnostics) -> Option<Self> {
        let origin = path.display().to_string();

        match SlothFile::load(path) {
            Ok(file) => Some(compile(&file, &origin, diagnostics)),
            Err(SlothError::Io { message, .. }) => {
                diagnostics.push(
                    Diagnostic::new(Kind::Unreadable, format!("{}: {}", origin, message))
                        .with_help("The file's options are skipped"),
                );
                None
            }
            Err(e) => {
                diagnostics.push(
                    Diagnostic::new(Kind::Syntax, format!("{}: {}", origin, e))
                        .with_help("The file's options are skipped"),
                );
                None
            }
        }
    }

    /// Parse and compile option file content.
    pub fn from_source(source: &str, origin: &str, diagnostics: &mut Diagnostics) -> Option<Self> {
        match SlothFile::parse(source) {
            Ok(file) => Some(compile(&file, origin, diagnostics)),
            Err(e) => {
                diagnostics.report(Kind::Syntax, format!("{}: {}", origin, e));
                None
            }
        }
    }

    /// Apply the overlay to a bundle.
    ///
    /// Scalars are overwritten. Collections are cleared first for the
    /// replacing keys; the `add*` keys keep existing entries and report when
    /// an entry is overwritten with a different value.
    pub fn apply(&self, bundle: &mut OptionBundle, diagnostics: &mut Diagnostics) {
        for change in &self.changes {
            match change {
                OptionChange::Colours { replace, colours } => {
                    if *replace {
                        bundle.light_colours.clear();
                    }
                    for (name, colour) in colours {
                        if let Some(previous) = bundle.add_light_colour(name, *colour) {
                            diagnostics.report(
                                Kind::Conflict,
                                format!(
                                    "{}: overwriting light colour {}: {} -> {}",
                                    self.origin, name, previous, colour
                                ),
                            );
                        }
                    }
                }
                OptionChange::Lights {
                    custom,
                    replace,
                    intensities,
                } => {
                    if *replace {
                        if *custom {
                            bundle.custom_lights.clear();
                        } else {
                            bundle.predef_lights.clear();
                        }
                    }
                    for intensity in intensities {
                        if let Some(previous) = bundle.add_light_intensity(*intensity, *custom) {
                            diagnostics.report(
                                Kind::Conflict,
                                format!(
                                    "{}: light intensity {} replaces {} in the same bucket",
                                    self.origin, intensity, previous
                                ),
                            );
                        }
                    }
                }
                OptionChange::ColourBlendExp(exp) => bundle.colour_blend_exp = *exp,
                OptionChange::AlphaTest(test) => bundle.alpha_test = *test,
                OptionChange::AlphaShadows(on) => bundle.alpha_shadows = *on,
                OptionChange::HeightNormalsMod(modifier) => bundle.height_normals_mod = *modifier,
                OptionChange::Renderer(renderer) => bundle.renderer = *renderer,
                OptionChange::GuessKeywords(on) => bundle.guess_keywords = *on,
                OptionChange::PrecalcColours(on) => bundle.precalc_colours = *on,
                OptionChange::EditorOpacity(opacity) => bundle.editor_opacity = *opacity,
                OptionChange::Keyword {
                    section,
                    key,
                    value,
                } => match section {
                    KeywordSection::Replace => bundle.keywords.replace(key, value.clone()),
                    KeywordSection::Add => bundle.keywords.extend(key, value.clone()),
                    KeywordSection::Delete => bundle.keywords.delete(key, value.clone()),
                },
            }
        }
    }
}

/// The option files of one source directory and the directory-level bundle.
#[derive(Debug, Clone)]
pub struct DirectoryOptions {
    bundle: OptionBundle,
    by_name: BTreeMap<String, OptionOverlay>,
}

impl DirectoryOptions {
    /// Load `options.sloth` and all per-name option files of a directory.
    pub fn load(
        dir: &Path,
        listing: &DirectoryListing,
        defaults: &OptionBundle,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let file_path = |stem: &str| dir.join(format!("{}.{}", stem, OPTIONS_EXTENSION));

        let default = if listing.has_default_options() {
            OptionOverlay::load(&file_path(DEFAULT_OPTIONS_STEM), diagnostics)
        } else {
            None
        };

        let by_name = listing
            .option_stems()
            .into_iter()
            .filter_map(|stem| {
                OptionOverlay::load(&file_path(&stem), diagnostics).map(|overlay| (stem, overlay))
            })
            .collect();

        Self::new(defaults, default, by_name, diagnostics)
    }

    /// Build from already compiled overlays.
    pub fn new(
        defaults: &OptionBundle,
        default: Option<OptionOverlay>,
        by_name: BTreeMap<String, OptionOverlay>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut bundle = defaults.clone();
        if let Some(overlay) = &default {
            overlay.apply(&mut bundle, diagnostics);
        }

        Self { bundle, by_name }
    }

    /// The directory-level bundle (defaults plus `options.sloth`).
    pub fn bundle(&self) -> &OptionBundle {
        &self.bundle
    }

    /// Per-name overlays matching a shader, shortest prefix first.
    pub fn matching(&self, shader_name: &str) -> Vec<&OptionOverlay> {
        let mut ends: Vec<usize> = shader_name
            .char_indices()
            .map(|(i, _)| i)
            .skip(1)
            .collect();
        ends.push(shader_name.len());

        ends.into_iter()
            .filter_map(|end| self.by_name.get(&shader_name[..end]))
            .collect()
    }

    /// Resolve the options for one shader.
    ///
    /// Always returns a fresh bundle; the directory bundle is never touched.
    pub fn resolve(&self, shader_name: &str, diagnostics: &mut Diagnostics) -> OptionBundle {
        let mut bundle = self.bundle.clone();

        for overlay in self.matching(shader_name) {
            overlay.apply(&mut bundle, diagnostics);
        }

        bundle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn overlay(source: &str, origin: &str) -> OptionOverlay {
        let mut diagnostics = Diagnostics::new();
        let overlay = OptionOverlay::from_source(source, origin, &mut diagnostics).unwrap();
        assert!(diagnostics.is_ok(), "{:?}", diagnostics);
        overlay
    }

    #[test]
    fn test_most_specific_file_wins() {
        let mut defaults = OptionBundle::default();
        defaults.alpha_shadows = true;

        let mut by_name = BTreeMap::new();
        by_name.insert(
            "grate".to_string(),
            overlay("[options]\nalphaShadows = on\n", "grate.sloth"),
        );

        let mut diagnostics = Diagnostics::new();
        let options = DirectoryOptions::new(
            &defaults,
            Some(overlay("[options]\nalphaShadows = off\n", "options.sloth")),
            by_name,
            &mut diagnostics,
        );

        assert!(options.resolve("grate01", &mut diagnostics).alpha_shadows);
        assert!(!options.resolve("wall", &mut diagnostics).alpha_shadows);
        assert!(!options.bundle().alpha_shadows);
        assert!(defaults.alpha_shadows);
    }

    #[test]
    fn test_prefix_order() {
        let mut by_name = BTreeMap::new();
        by_name.insert("m".to_string(), overlay("[options]\ncolorBlendExp = 2.0\n", "m.sloth"));
        by_name.insert(
            "metal".to_string(),
            overlay("[options]\ncolorBlendExp = 3.0\n", "metal.sloth"),
        );
        by_name.insert(
            "metal_plate".to_string(),
            overlay("[options]\ncolorBlendExp = 4.0\n", "metal_plate.sloth"),
        );

        let mut diagnostics = Diagnostics::new();
        let options = DirectoryOptions::new(&OptionBundle::default(), None, by_name, &mut diagnostics);

        let origins: Vec<&str> = options
            .matching("metal_plate")
            .iter()
            .map(|o| o.origin.as_str())
            .collect();
        assert_eq!(origins, vec!["m.sloth", "metal.sloth", "metal_plate.sloth"]);

        assert_eq!(options.resolve("metal_plate", &mut diagnostics).colour_blend_exp, 4.0);
        assert_eq!(options.resolve("metal_grate", &mut diagnostics).colour_blend_exp, 3.0);
        assert_eq!(options.resolve("mud", &mut diagnostics).colour_blend_exp, 2.0);
        assert_eq!(options.resolve("stone", &mut diagnostics).colour_blend_exp, 1.0);
    }

    #[test]
    fn test_resolved_bundles_are_independent() {
        let mut diagnostics = Diagnostics::new();
        let options = DirectoryOptions::new(
            &OptionBundle::default(),
            Some(overlay("[options]\naddColors = red:ff0000\n", "options.sloth")),
            BTreeMap::new(),
            &mut diagnostics,
        );

        let mut first = options.resolve("a", &mut diagnostics);
        first.light_colours.clear();
        first.keywords.replace("cull", KeywordValue::single("none"));

        let second = options.resolve("b", &mut diagnostics);
        assert_eq!(second.light_colours.len(), 2);
        assert!(second.keywords.set.is_empty());
        assert_eq!(options.bundle().light_colours.len(), 2);
    }

    #[test]
    fn test_replace_and_extend_collections() {
        let mut bundle = OptionBundle::default();
        let mut diagnostics = Diagnostics::new();

        overlay(
            "[options]\ncolors = red:ff0000\naddColors = blue:0000ff\npredefLights = 100\naddCustomLights = 8000\n",
            "test",
        )
        .apply(&mut bundle, &mut diagnostics);

        let colours: Vec<&str> = bundle.light_colours.keys().map(|k| k.as_str()).collect();
        assert_eq!(colours, vec!["blue", "red"]);
        assert_eq!(bundle.predef_lights.values().copied().collect::<Vec<_>>(), vec![100]);
        assert_eq!(bundle.custom_lights.len(), 4);
        assert!(diagnostics.is_ok());
    }

    #[test]
    fn test_conflicting_colour_is_reported() {
        let mut bundle = OptionBundle::default();
        let mut diagnostics = Diagnostics::new();

        overlay("[options]\naddColors = white:eeeeee\n", "lamp.sloth").apply(&mut bundle, &mut diagnostics);

        assert_eq!(bundle.light_colours["white"], LightColour::rgb(0xee, 0xee, 0xee));
        assert!(diagnostics.contains(Kind::Conflict));
    }

    #[test]
    fn test_intensities_sharing_a_bucket_conflict() {
        let mut bundle = OptionBundle::default();
        let mut diagnostics = Diagnostics::new();

        overlay("[options]\naddCustomLights = 10000\n", "lamp.sloth").apply(&mut bundle, &mut diagnostics);
        assert!(diagnostics.is_ok());

        overlay("[options]\naddCustomLights = 10500\naddPredefLights = 200\n", "lamp_big.sloth")
            .apply(&mut bundle, &mut diagnostics);

        assert_eq!(bundle.custom_lights["10k"], 10500);
        assert_eq!(bundle.custom_lights.len(), 4);
        assert_eq!(diagnostics.len(), 1);
        let conflict = diagnostics.iter().next().unwrap();
        assert_eq!(conflict.kind, Kind::Conflict);
        assert!(conflict.message.starts_with("lamp_big.sloth:"));
        assert!(conflict.message.contains("10500 replaces 10000"));
    }

    #[test]
    fn test_predef_bucket_conflict() {
        let mut bundle = OptionBundle::default();
        let mut diagnostics = Diagnostics::new();

        overlay("[options]\naddPredefLights = 20000 20999\n", "neon.sloth").apply(&mut bundle, &mut diagnostics);

        assert_eq!(bundle.predef_lights["20k"], 20999);
        assert!(diagnostics.contains(Kind::Conflict));
        assert!(bundle.custom_lights.values().all(|&i| i < 10000));
    }

    #[test]
    fn test_keyword_sections_accumulate_in_bundle() {
        let mut bundle = OptionBundle::default();
        let mut diagnostics = Diagnostics::new();

        overlay("[addKeywords]\nsurfaceparm = metalsteps\n", "metal.sloth").apply(&mut bundle, &mut diagnostics);
        overlay("[addKeywords]\nsurfaceparm = dust\n[delKeywords]\ncull\n", "metal_old.sloth")
            .apply(&mut bundle, &mut diagnostics);

        assert_eq!(
            bundle.keywords.add.get("surfaceparm"),
            Some(&KeywordValue::values(["dust", "metalsteps"]))
        );
        assert_eq!(bundle.keywords.remove.get("cull"), Some(&KeywordValue::Bare));
    }

    #[test]
    fn test_load_directory_options() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("options.sloth"), "[options]\nalphaShadows = off\n").unwrap();
        fs::write(dir.path().join("lamp.sloth"), "[options]\nrenderer = daemon\n").unwrap();

        let listing = DirectoryListing::from_names(["options.sloth", "lamp.sloth", "lamp_d.png"]);
        let mut diagnostics = Diagnostics::new();
        let options = DirectoryOptions::load(dir.path(), &listing, &OptionBundle::default(), &mut diagnostics);

        assert!(diagnostics.is_ok());
        assert!(!options.bundle().alpha_shadows);
        assert_eq!(options.resolve("lamp_red", &mut diagnostics).renderer, Renderer::Daemon);
        assert_eq!(options.resolve("wall", &mut diagnostics).renderer, Renderer::Xreal);
    }

    #[test]
    fn test_unreadable_file_is_reported_and_skipped() {
        let dir = tempdir().unwrap();
        let listing = DirectoryListing::from_names(["options.sloth"]);
        let mut diagnostics = Diagnostics::new();

        let options = DirectoryOptions::load(dir.path(), &listing, &OptionBundle::default(), &mut diagnostics);

        assert!(diagnostics.contains(Kind::Unreadable));
        assert_eq!(options.bundle(), &OptionBundle::default());
    }

    #[test]
    fn test_broken_syntax_skips_whole_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("options.sloth"), "alphaShadows = off\n").unwrap();

        let listing = DirectoryListing::from_names(["options.sloth"]);
        let mut diagnostics = Diagnostics::new();
        let options = DirectoryOptions::load(dir.path(), &listing, &OptionBundle::default(), &mut diagnostics);

        assert!(diagnostics.contains(Kind::Syntax));
        assert!(options.bundle().alpha_shadows);
    }
}
