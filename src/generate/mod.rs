//! Shader generation for texture source directories.
//!
//! The generator runs the whole pipeline for one directory at a time:
//!
//! 1. list the directory and group its files into shaders,
//! 2. resolve each shader's options through the overlay chain,
//! 3. read image metadata,
//! 4. assemble keywords,
//! 5. expand light emitting shaders into variants,
//! 6. store the results in the named set.
//!
//! Problems that only affect one value, file or shader are collected as
//! diagnostics; only a directory that can't be listed fails the call.
//!
//! # Example
//!
//! ```ignore
//! use sloth::generate::Generator;
//!
//! let mut generator = Generator::new(OptionBundle::default(), Suffixes::default());
//! let summary = generator.generate_set(Path::new("textures/metal_src"), None, Some("_src"))?;
//! println!("{}: {} shaders", summary.set, summary.shaders);
//! ```

mod keywords;
mod lights;

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::analysis::{analyze, FileImageProvider, ImageProvider};
use crate::diagnostics::{Diagnostic, Diagnostics, Kind};
use crate::discovery::{associate, relative_path_for, scan_directory, set_name_for};
use crate::error::{Result, SlothError};
use crate::overlay::DirectoryOptions;
use crate::registry::ShaderRegistry;
use crate::types::{OptionBundle, ShaderRecord, ShaderSource, Suffixes};

pub use keywords::{assemble_keywords, guess_surface_parms, SURFACE_PARM_GUESSES};
pub use lights::{expand_lights, OFF_SUFFIX};

/// Extensions of layered image sources that are never used as maps.
pub const DEFAULT_SKIP_EXTENSIONS: &[&str] = &["xcf", "psd", "kra", "ora"];

/// What one `generate_set` call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetSummary {
    pub set: String,
    /// Diffuse maps found, before light expansion.
    pub variants: usize,
    /// Distinct shader names this call put into the set.
    pub shaders: usize,
}

/// Generates shader sets from texture source directories.
pub struct Generator<P = FileImageProvider> {
    defaults: OptionBundle,
    suffixes: Suffixes,
    skip_extensions: Vec<String>,
    provider: P,
    registry: ShaderRegistry,
    diagnostics: Diagnostics,
}

impl Generator<FileImageProvider> {
    /// Create a generator that decodes maps from disk.
    pub fn new(defaults: OptionBundle, suffixes: Suffixes) -> Self {
        Self::with_provider(defaults, suffixes, FileImageProvider)
    }
}

impl<P: ImageProvider> Generator<P> {
    /// Create a generator with a custom image provider.
    pub fn with_provider(defaults: OptionBundle, suffixes: Suffixes, provider: P) -> Self {
        Self {
            defaults,
            suffixes,
            skip_extensions: DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            provider,
            registry: ShaderRegistry::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Replace the list of ignored file extensions.
    pub fn with_skip_extensions(mut self, extensions: Vec<String>) -> Self {
        self.skip_extensions = extensions;
        self
    }

    pub fn defaults(&self) -> &OptionBundle {
        &self.defaults
    }

    pub fn registry(&self) -> &ShaderRegistry {
        &self.registry
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Consume the generator, returning the generated sets and diagnostics.
    pub fn finish(self) -> (ShaderRegistry, Diagnostics) {
        (self.registry, self.diagnostics)
    }

    /// Generate shaders for one source directory.
    ///
    /// The set is named `set_name` if given, otherwise after the directory's
    /// parent and own name with `strip` removed from the end. Generating
    /// several directories into the same set name merges them.
    pub fn generate_set(
        &mut self,
        path: &Path,
        set_name: Option<&str>,
        strip: Option<&str>,
    ) -> Result<SetSummary> {
        let abs_path = absolute_source(path)?;
        let rel_path = relative_path_for(&abs_path);
        let set = match set_name {
            Some(name) => name.to_string(),
            None => set_name_for(&rel_path, strip),
        };

        let listing = scan_directory(&abs_path)?;
        let options = DirectoryOptions::load(&abs_path, &listing, &self.defaults, &mut self.diagnostics);
        let associations = associate(&listing, &self.suffixes, &self.skip_extensions);

        let source = ShaderSource {
            rel_path,
            abs_path,
        };

        let mut plain = Vec::new();
        let mut expanded = Vec::new();

        for association in &associations {
            let bundle = options.resolve(&association.name, &mut self.diagnostics);
            let mut record = ShaderRecord::new(
                association.name.clone(),
                source.clone(),
                association.maps.clone(),
                bundle,
            );

            if let Err(e) = analyze(&mut record, &self.provider) {
                self.diagnostics.push(
                    Diagnostic::new(
                        Kind::Decode,
                        format!("Skipping shader {}/{}: {}", set, record.name, e),
                    )
                    .with_help("Check that the map is a readable image file"),
                );
                continue;
            }

            assemble_keywords(&mut record);

            let mut records = expand_lights(record);
            if records.len() == 1 && records[0].name == association.name {
                plain.append(&mut records);
            } else {
                expanded.append(&mut records);
            }
        }

        // Expanded names win over plain shaders that happen to share them
        let mut inserted = BTreeSet::new();
        for record in plain.into_iter().chain(expanded) {
            let name = record.name.clone();
            inserted.insert(name.clone());
            if self.registry.set_mut(&set).insert(record).is_some() {
                self.diagnostics.push(
                    Diagnostic::new(
                        Kind::NameCollision,
                        format!("Shader {}/{} defined more than once, keeping the last one", set, name),
                    )
                    .with_help("Rename one of the texture maps"),
                );
            }
        }

        Ok(SetSummary {
            set,
            variants: associations.len(),
            shaders: inserted.len(),
        })
    }
}

/// Make a source path absolute without resolving symlinks.
///
/// Set names and script paths come from the path as given, so a linked
/// `textures/metal_src` keeps its name. `..` is removed lexically.
fn absolute_source(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|e| SlothError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to resolve source directory: {}", e),
    })?;

    let mut normal = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }

    if !normal.is_dir() {
        return Err(SlothError::Io {
            path: path.to_path_buf(),
            message: "Not a directory".to_string(),
        });
    }

    Ok(normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::{gray, opaque_rgb, rgba_with_alpha, FakeProvider};
    use crate::types::{MapType, Renderer};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn source_dir(files: &[(&str, &str)]) -> (TempDir, std::path::PathBuf) {
        let root = tempdir().unwrap();
        let dir = root.path().join("textures").join("base_src");
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            fs::write(dir.join(name), content).unwrap();
        }
        (root, dir)
    }

    fn generator(provider: FakeProvider) -> Generator<FakeProvider> {
        Generator::with_provider(OptionBundle::default(), Suffixes::default(), provider)
    }

    #[test]
    fn test_generate_wall() {
        let (_root, dir) = source_dir(&[("wall_d.tga", ""), ("wall_n.tga", ""), ("wall_h.tga", "")]);
        let mut generator = generator(FakeProvider::default().with("wall_d.tga", opaque_rgb()));

        let summary = generator.generate_set(&dir, None, Some("_src")).unwrap();

        assert_eq!(summary.set, "textures/base");
        assert_eq!(summary.variants, 1);
        assert_eq!(summary.shaders, 1);

        let wall = generator.registry().shader("textures/base", "wall").unwrap();
        assert_eq!(wall.maps.stem(MapType::Diffuse), Some("wall_d"));
        assert_eq!(wall.maps.stem(MapType::Normal), Some("wall_n"));
        assert_eq!(wall.maps.stem(MapType::Height), Some("wall_h"));
        assert_eq!(wall.maps.stem(MapType::Addition), None);
        assert_eq!(wall.source.rel_path, "textures/base_src");
        assert!(generator.diagnostics().is_ok());
    }

    #[test]
    fn test_directory_options_apply_to_every_shader() {
        let (_root, dir) = source_dir(&[
            ("options.sloth", "[options]\nalphaShadows = off\n"),
            ("grate01.sloth", "[options]\nalphaShadows = on\n"),
            ("grate01_d.png", ""),
            ("fence_d.png", ""),
        ]);
        let provider = FakeProvider::default()
            .with("grate01_d.png", rgba_with_alpha(&[0, 128, 255]))
            .with("fence_d.png", rgba_with_alpha(&[0, 128, 255]));
        let mut generator = generator(provider);

        generator.generate_set(&dir, None, Some("_src")).unwrap();

        let registry = generator.registry();
        let grate = registry.shader("textures/base", "grate01").unwrap();
        let fence = registry.shader("textures/base", "fence").unwrap();
        assert!(grate.options.alpha_shadows);
        assert!(grate.keywords.has_value("surfaceparm", "alphashadows"));
        assert!(!fence.options.alpha_shadows);
        assert!(!fence.keywords.has_value("surfaceparm", "alphashadows"));
        assert!(generator.defaults().alpha_shadows);
    }

    #[test]
    fn test_light_expansion_replaces_plain_record() {
        let (_root, dir) = source_dir(&[("lamp_d.png", ""), ("lamp_a.png", "")]);
        let provider = FakeProvider::default()
            .with("lamp_d.png", opaque_rgb())
            .with("lamp_a.png", gray());
        let mut generator = generator(provider);

        let summary = generator.generate_set(&dir, Some("lights"), None).unwrap();

        // white × (1000, 2000, 4000) + off
        assert_eq!(summary.variants, 1);
        assert_eq!(summary.shaders, 4);
        let set = generator.registry().get("lights").unwrap();
        assert_eq!(
            set.names().collect::<Vec<_>>(),
            vec!["lamp_off", "lamp_white_1000", "lamp_white_2000", "lamp_white_4000"]
        );
        assert!(!set.contains("lamp"));
    }

    #[test]
    fn test_name_collision_is_reported() {
        let root = tempdir().unwrap();
        for dir in ["a_src", "b_src"] {
            let path = root.path().join(dir);
            fs::create_dir(&path).unwrap();
            fs::write(path.join("wall_d.png"), "").unwrap();
        }
        let mut generator = generator(FakeProvider::default().with("wall_d.png", opaque_rgb()));

        generator.generate_set(&root.path().join("a_src"), Some("all"), None).unwrap();
        assert!(generator.diagnostics().is_ok());
        generator.generate_set(&root.path().join("b_src"), Some("all"), None).unwrap();

        assert!(generator.diagnostics().contains(Kind::NameCollision));
        let wall = generator.registry().shader("all", "wall").unwrap();
        assert!(wall.source.rel_path.ends_with("/b_src"));
    }

    #[test]
    fn test_undecodable_map_skips_only_that_shader() {
        let (_root, dir) = source_dir(&[("wall_d.png", ""), ("broken_d.png", "")]);
        let mut generator = generator(FakeProvider::default().with("wall_d.png", opaque_rgb()));

        let summary = generator.generate_set(&dir, None, None).unwrap();

        assert_eq!(summary.variants, 2);
        assert_eq!(summary.shaders, 1);
        assert!(generator.diagnostics().contains(Kind::Decode));
        assert!(generator.registry().shader("textures/base_src", "wall").is_some());
    }

    #[test]
    fn test_merging_directories_into_one_set() {
        let root = tempdir().unwrap();
        for (dir, file) in [("a_src", "wall_d.png"), ("b_src", "floor_d.png")] {
            let path = root.path().join(dir);
            fs::create_dir(&path).unwrap();
            fs::write(path.join(file), "").unwrap();
        }
        let provider = FakeProvider::default()
            .with("wall_d.png", opaque_rgb())
            .with("floor_d.png", opaque_rgb());
        let mut generator = generator(provider);

        generator.generate_set(&root.path().join("a_src"), Some("textures/all"), None).unwrap();
        generator.generate_set(&root.path().join("b_src"), Some("textures/all"), None).unwrap();

        let set = generator.registry().get("textures/all").unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["floor", "wall"]);
        assert_eq!(generator.registry().len(), 1);
    }

    #[test]
    fn test_per_shader_renderer_override() {
        let (_root, dir) = source_dir(&[("lamp.sloth", "[options]\nrenderer = daemon\n"), ("lamp_d.png", "")]);
        let mut generator = generator(FakeProvider::default().with("lamp_d.png", opaque_rgb()));

        generator.generate_set(&dir, Some("s"), None).unwrap();

        assert_eq!(generator.registry().shader("s", "lamp").unwrap().options.renderer, Renderer::Daemon);
    }

    #[test]
    fn test_missing_directory_fails() {
        let mut generator = generator(FakeProvider::default());
        assert!(generator.generate_set(Path::new("/nonexistent/base_src"), None, None).is_err());
    }

    #[test]
    fn test_skip_extensions() {
        let (_root, dir) = source_dir(&[("wall_d.png", ""), ("wall_d.xcf", ""), ("crate_d.psd", "")]);
        let mut generator = generator(FakeProvider::default().with("wall_d.png", opaque_rgb()));

        let summary = generator.generate_set(&dir, None, None).unwrap();

        assert_eq!(summary.variants, 1);
        assert!(generator.diagnostics().is_ok());
    }

    #[test]
    fn test_collisions_are_not_counted_twice() {
        let (_root, dir) = source_dir(&[
            ("lamp_d.png", ""),
            ("lamp_a.png", ""),
            ("lamp_white_1000_d.png", ""),
            ("lamp_white_1000.sloth", "[options]\ncustomLights =\n"),
        ]);
        let provider = FakeProvider::default()
            .with("lamp_d.png", opaque_rgb())
            .with("lamp_white_1000_d.png", opaque_rgb())
            .with("lamp_a.png", gray());
        let mut generator = generator(provider);

        let summary = generator.generate_set(&dir, Some("lights"), None).unwrap();

        assert!(generator.diagnostics().contains(Kind::NameCollision));
        assert_eq!(summary.variants, 2);
        assert_eq!(summary.shaders, 4);
        assert_eq!(generator.registry().get("lights").unwrap().len(), summary.shaders);
        let lamp = generator.registry().shader("lights", "lamp_white_1000").unwrap();
        assert_eq!(lamp.meta.light_intensity, Some(1000));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_source_keeps_its_own_name() {
        let root = tempdir().unwrap();
        let store = root.path().join("store").join("abc123");
        let textures = root.path().join("textures");
        fs::create_dir_all(&store).unwrap();
        fs::create_dir_all(&textures).unwrap();
        fs::write(store.join("wall_d.png"), "").unwrap();
        let link = textures.join("metal_src");
        std::os::unix::fs::symlink(&store, &link).unwrap();

        let mut generator = generator(FakeProvider::default().with("wall_d.png", opaque_rgb()));
        let summary = generator.generate_set(&link, None, Some("_src")).unwrap();

        assert_eq!(summary.set, "textures/metal");
        let wall = generator.registry().shader("textures/metal", "wall").unwrap();
        assert_eq!(wall.source.rel_path, "textures/metal_src");
        assert_eq!(wall.script_path(MapType::Diffuse).as_deref(), Some("textures/metal_src/wall_d"));
    }

    #[test]
    fn test_parent_components_are_resolved_lexically() {
        let (root, dir) = source_dir(&[("wall_d.png", "")]);
        let roundabout = dir.join("..").join(".").join("base_src");
        let mut generator = generator(FakeProvider::default().with("wall_d.png", opaque_rgb()));

        let summary = generator.generate_set(&roundabout, None, Some("_src")).unwrap();

        assert_eq!(summary.set, "textures/base");
        assert_eq!(absolute_source(&roundabout).unwrap(), root.path().join("textures").join("base_src"));
    }

    #[test]
    fn test_missing_source_directory_fails() {
        let root = tempdir().unwrap();
        let mut generator = generator(FakeProvider::default());

        assert!(generator.generate_set(&root.path().join("nope_src"), None, None).is_err());
        assert!(generator.registry().is_empty());
    }
}
