//! Generate command implementation.
//!
//! Scans texture source directories and writes the resulting shader file.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::diagnostics::{print_diagnostics, Diagnostics};
use crate::discovery::{find_manifest, Manifest};
use crate::error::{Result, SlothError};
use crate::generate::{Generator, DEFAULT_SKIP_EXTENSIONS};
use crate::output::{display_path, plural, Printer};
use crate::overlay::OptionOverlay;
use crate::render::{emit, Selection};
use crate::types::{parse_named_colour, AlphaFunc, AlphaTest, LightColour, MapType, OptionBundle, Renderer, Suffixes};

/// Suffix stripped from source directory names unless told otherwise.
pub const DEFAULT_STRIP: &str = "_src";

/// Generate a shader file from texture source directories
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Texture source directories (default: sources listed in sloth.yaml)
    pub paths: Vec<PathBuf>,

    /// Global options file, applied on top of the command line options
    #[arg(long, short = 'f', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Guess surfaceparms from shader names
    #[arg(long, short = 'g')]
    pub guess: bool,

    /// Modifier for normals generated from height maps, 0 to disable
    #[arg(long, value_name = "F")]
    pub height_normals: Option<f64>,

    /// Generate for the Daemon renderer
    #[arg(long, group = "renderer")]
    pub daemon: bool,

    /// Generate for the XreaL renderer (default)
    #[arg(long, group = "renderer")]
    pub xreal: bool,

    /// Generate for vanilla Quake 3
    #[arg(long, group = "renderer")]
    pub quake3: bool,

    /// Suffix of diffuse maps
    #[arg(long, short = 'd', value_name = "SUF", default_value = "_d")]
    pub diff: String,

    /// Suffix of normal maps
    #[arg(long, short = 'n', value_name = "SUF", default_value = "_n")]
    pub normal: String,

    /// Suffix of combined normal and height maps
    #[arg(long, value_name = "SUF", default_value = "_nh")]
    pub normal_height: String,

    /// Suffix of height maps
    #[arg(long, short = 'z', value_name = "SUF", default_value = "_h")]
    pub height: String,

    /// Suffix of physical maps
    #[arg(long, value_name = "SUF", default_value = "_phys")]
    pub physical: String,

    /// Suffix of specular maps
    #[arg(long, short = 's', value_name = "SUF", default_value = "_s")]
    pub spec: String,

    /// Suffix of addition (glow) maps
    #[arg(long, short = 'a', value_name = "SUF", default_value = "_a")]
    pub add: String,

    /// Suffix of editor preview images
    #[arg(long, short = 'p', value_name = "SUF", default_value = "_p")]
    pub prev: String,

    /// Light colours for grayscale addition maps (default: white:ffffff)
    #[arg(long, short = 'c', value_name = "NAME:COLOR", num_args = 1.., value_parser = parse_colour_arg)]
    pub colors: Option<Vec<(String, LightColour)>>,

    /// Light intensities for grayscale addition maps (default: 1000 2000 4000)
    #[arg(long, short = 'l', value_name = "N", num_args = 1..)]
    pub custom_lights: Option<Vec<u32>>,

    /// Light intensities for coloured addition maps (default: 0 200)
    #[arg(long, short = 'i', value_name = "N", num_args = 1..)]
    pub predef_lights: Option<Vec<u32>>,

    /// Exponent applied to light colour channels in the addition stage
    #[arg(long, value_name = "F")]
    pub color_blend_exp: Option<f64>,

    /// Use alphaFunc GT0 instead of smooth alpha blending
    #[arg(long, group = "alpha")]
    pub gt0: bool,

    /// Use alphaFunc GE128 instead of smooth alpha blending
    #[arg(long, group = "alpha")]
    pub ge128: bool,

    /// Use alphaFunc LT128 instead of smooth alpha blending
    #[arg(long, group = "alpha")]
    pub lt128: bool,

    /// Use alphaTest with this threshold instead of smooth alpha blending
    #[arg(long, group = "alpha", value_name = "F", value_parser = parse_threshold_arg)]
    pub alpha_test: Option<f64>,

    /// Don't add the alphashadows surfaceparm
    #[arg(long)]
    pub no_alpha_shadows: bool,

    /// Use the average addition map colour as surface light colour
    #[arg(long)]
    pub precalc_colors: bool,

    /// Opacity of shaders in the map editor (qer_trans)
    #[arg(long, value_name = "F", value_parser = parse_threshold_arg)]
    pub editor_opacity: Option<f64>,

    /// Put all shaders into one set with this name
    #[arg(long, short = 'r', value_name = "NAME", conflicts_with = "strip")]
    pub root: Option<String>,

    /// Suffix removed from source directory names to form set names (default: _src)
    #[arg(long, short = 'x', value_name = "SUF")]
    pub strip: Option<String>,

    /// File extensions never used as maps (default: xcf psd kra ora)
    #[arg(long, value_name = "EXT", num_args = 1..)]
    pub skip_ext: Option<Vec<String>>,

    /// File whose content becomes the commented header
    #[arg(long, short = 't', value_name = "FILE")]
    pub header: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Only emit this set
    #[arg(long, value_name = "NAME")]
    pub set: Option<String>,

    /// Only emit shaders with this name
    #[arg(long, value_name = "NAME")]
    pub shader: Option<String>,
}

fn parse_colour_arg(s: &str) -> std::result::Result<(String, LightColour), String> {
    parse_named_colour(s).map_err(|e| e.to_string())
}

fn parse_threshold_arg(s: &str) -> std::result::Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is outside 0..1", value))
    }
}

impl GenerateArgs {
    fn renderer(&self) -> Option<Renderer> {
        if self.daemon {
            Some(Renderer::Daemon)
        } else if self.xreal {
            Some(Renderer::Xreal)
        } else if self.quake3 {
            Some(Renderer::Quake3)
        } else {
            None
        }
    }

    fn alpha_test(&self) -> Option<AlphaTest> {
        if self.gt0 {
            Some(AlphaTest::Func(AlphaFunc::Gt0))
        } else if self.ge128 {
            Some(AlphaTest::Func(AlphaFunc::Ge128))
        } else if self.lt128 {
            Some(AlphaTest::Func(AlphaFunc::Lt128))
        } else {
            self.alpha_test.map(AlphaTest::Threshold)
        }
    }

    fn suffixes(&self) -> Suffixes {
        Suffixes::default()
            .with(MapType::Diffuse, &self.diff)
            .with(MapType::Normal, &self.normal)
            .with(MapType::NormalHeight, &self.normal_height)
            .with(MapType::Height, &self.height)
            .with(MapType::Physical, &self.physical)
            .with(MapType::Specular, &self.spec)
            .with(MapType::Addition, &self.add)
            .with(MapType::Preview, &self.prev)
    }

    /// Option defaults from the command line, falling back to the manifest.
    fn option_defaults(&self, manifest: &Manifest) -> Result<OptionBundle> {
        let mut bundle = OptionBundle::default();

        if let Some(colours) = &self.colors {
            bundle.light_colours.clear();
            for (name, colour) in colours {
                bundle.add_light_colour(name, *colour);
            }
        }
        if let Some(lights) = &self.custom_lights {
            bundle.custom_lights.clear();
            for &intensity in lights {
                bundle.add_light_intensity(intensity, true);
            }
        }
        if let Some(lights) = &self.predef_lights {
            bundle.predef_lights.clear();
            for &intensity in lights {
                bundle.add_light_intensity(intensity, false);
            }
        }

        bundle.guess_keywords = self.guess;
        bundle.alpha_shadows = !self.no_alpha_shadows;
        bundle.precalc_colours = self.precalc_colors;
        bundle.alpha_test = self.alpha_test();
        bundle.editor_opacity = self.editor_opacity;

        if let Some(exp) = self.color_blend_exp {
            bundle.colour_blend_exp = exp;
        }
        if let Some(modifier) = self.height_normals {
            bundle.height_normals_mod = modifier;
        }

        bundle.renderer = match (self.renderer(), &manifest.renderer) {
            (Some(renderer), _) => renderer,
            (None, Some(name)) => name.parse()?,
            (None, None) => Renderer::default(),
        };

        Ok(bundle)
    }
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let manifest = find_manifest(&cwd)?.unwrap_or_default();

    let sources = if args.paths.is_empty() {
        manifest.sources.clone()
    } else {
        args.paths.clone()
    };

    if sources.is_empty() {
        return Err(SlothError::Generate {
            message: "No texture source directories given".to_string(),
            help: Some("Pass directories to scan or list them under `sources` in sloth.yaml".to_string()),
        });
    }

    let mut diagnostics = Diagnostics::new();
    let mut defaults = args.option_defaults(&manifest)?;

    if let Some(config) = args.config.as_ref().or(manifest.config.as_ref()) {
        printer.info("Loading", &display_path(config));
        if let Some(overlay) = OptionOverlay::load(config, &mut diagnostics) {
            overlay.apply(&mut defaults, &mut diagnostics);
        }
    }

    let skip_extensions = args
        .skip_ext
        .clone()
        .or_else(|| manifest.skip_extensions.clone())
        .unwrap_or_else(|| DEFAULT_SKIP_EXTENSIONS.iter().map(|s| s.to_string()).collect());

    let root = args.root.as_deref().or(manifest.root.as_deref());
    let strip = args
        .strip
        .as_deref()
        .or(manifest.strip.as_deref())
        .unwrap_or(DEFAULT_STRIP);

    let mut generator = Generator::new(defaults, args.suffixes()).with_skip_extensions(skip_extensions);
    let mut failed = 0;

    for source in &sources {
        printer.status("Scanning", &display_path(source));

        match generator.generate_set(source, root, Some(strip)) {
            Ok(summary) if summary.variants == 0 => {
                printer.warning("Empty", &format!("{}: no diffuse maps found", summary.set))
            }
            Ok(summary) => printer.status(
                "Generated",
                &format!(
                    "{}: {} for {}",
                    summary.set,
                    plural(summary.shaders, "shader", "shaders"),
                    plural(summary.variants, "texture variant", "texture variants")
                ),
            ),
            Err(e) => {
                printer.error("Failed", &format!("{}: {}", display_path(source), e));
                failed += 1;
            }
        }
    }

    let (registry, generated) = generator.finish();
    diagnostics.merge(generated);

    printer.info(
        "Collected",
        &format!(
            "{} in {}",
            plural(registry.shader_count(), "shader", "shaders"),
            plural(registry.len(), "set", "sets")
        ),
    );

    let header = match args.header.as_ref().or(manifest.header.as_ref()) {
        Some(path) => Some(read_header(path)?),
        None => None,
    };

    let selection = Selection {
        set: args.set.as_deref(),
        shader: args.shader.as_deref(),
    };

    if let Some(content) = emit(&registry, header.as_deref(), selection, &mut diagnostics) {
        match args.out.as_ref().or(manifest.output.as_ref()) {
            Some(out) => {
                write_output(out, &content)?;
                printer.status("Writing", &display_path(out));
            }
            None => print!("{}", content),
        }
    }

    print_diagnostics(&diagnostics, printer);

    if failed > 0 {
        return Err(SlothError::Generate {
            message: format!("{} could not be processed", plural(failed, "source directory", "source directories")),
            help: None,
        });
    }

    Ok(())
}

fn read_header(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SlothError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read header: {}", e),
    })
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SlothError::Io {
            path: parent.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }

    fs::write(path, content).map_err(|e| SlothError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write shader file: {}", e),
    })
}
