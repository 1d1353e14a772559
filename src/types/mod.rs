//! Core domain types for sloth.
//!
//! - `LightColour` - RGB colours for light emitting shaders
//! - `OptionBundle` - overridable generation options
//! - `KeywordTable` / `KeywordOverlay` - emitted keywords and their overrides
//! - `ShaderRecord` / `MapSet` - one shader and its texture maps

mod colour;
mod keywords;
mod options;
mod shader;

pub use colour::{parse_named_colour, LightColour};
pub use keywords::{KeywordOverlay, KeywordTable, KeywordValue};
pub use options::{intensity_name, light_intensity, AlphaFunc, AlphaTest, OptionBundle, Renderer};
pub use shader::{MapFile, MapSet, MapType, ShaderMeta, ShaderRecord, ShaderSource, Suffixes};
