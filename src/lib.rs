//! sloth - Shader generator for texture source directories
//!
//! A library for turning directories of texture maps into shader scripts
//! for Quake 3, XreaL and Daemon based renderers.

pub mod analysis;
pub mod cli;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod generate;
pub mod output;
pub mod overlay;
pub mod parser;
pub mod registry;
pub mod render;
pub mod types;

pub use analysis::{analyze, FileImageProvider, ImageInfo, ImageProvider};
pub use diagnostics::{Diagnostic, Diagnostics, ErrorClass, Kind, Severity};
pub use discovery::{associate, scan_directory, Association, DirectoryListing, Manifest};
pub use error::{Result, SlothError};
pub use generate::{Generator, SetSummary};
pub use overlay::{DirectoryOptions, OptionOverlay};
pub use registry::{ShaderRegistry, ShaderSet};
pub use render::{emit, Selection, ShaderScript};
pub use types::{LightColour, MapType, OptionBundle, Renderer, ShaderRecord, Suffixes};
