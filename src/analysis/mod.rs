//! Image metadata analysis.
//!
//! The analyzer never decodes images itself. It asks an [`ImageProvider`]
//! for an [`ImageInfo`] summary of each map and derives the facts the
//! keyword assembler and the emitter need:
//!
//! - whether the diffuse map has a meaningful alpha channel,
//! - whether that alpha channel is strictly binary,
//! - whether the addition map is grayscale (and so can be tinted),
//! - optionally, the addition map's average colour.

mod decoder;

use std::path::Path;

use palette::Srgb;

use crate::error::{Result, SlothError};
use crate::types::{MapType, ShaderRecord};

pub use decoder::FileImageProvider;

/// Upper bound on the distinct colours a provider samples.
pub const MAX_SAMPLED_COLOURS: usize = 256;

/// Colour layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColourMode {
    Luma,
    LumaAlpha,
    Rgb,
    Rgba,
    /// Indexed colour; `transparency` if the palette marks a transparent entry.
    Palette { transparency: bool },
}

impl ColourMode {
    /// Whether the layout can carry transparency at all.
    pub fn has_alpha(self) -> bool {
        match self {
            ColourMode::LumaAlpha | ColourMode::Rgba => true,
            ColourMode::Palette { transparency } => transparency,
            ColourMode::Luma | ColourMode::Rgb => false,
        }
    }

    pub fn is_luma(self) -> bool {
        matches!(self, ColourMode::Luma | ColourMode::LumaAlpha)
    }
}

/// Summary of one image, as reported by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub mode: ColourMode,
    /// Smallest and largest alpha value, if the image has alpha.
    pub alpha_extrema: Option<(u8, u8)>,
    /// Pixel count per alpha value; empty without alpha.
    pub alpha_histogram: Vec<u32>,
    /// Distinct RGB colours, at most [`MAX_SAMPLED_COLOURS`].
    pub colours: Vec<[u8; 3]>,
    /// Mean of each RGB channel, 0 to 255.
    pub channel_means: [f64; 3],
}

impl ImageInfo {
    /// Alpha is present and not fully opaque everywhere.
    pub fn has_meaningful_alpha(&self) -> bool {
        self.mode.has_alpha() && !matches!(self.alpha_extrema, Some((255, 255)))
    }

    /// Every pixel is either fully transparent or fully opaque.
    pub fn alpha_is_binary(&self) -> bool {
        if self.alpha_histogram.is_empty() {
            return false;
        }

        self.alpha_histogram
            .iter()
            .enumerate()
            .all(|(value, &count)| count == 0 || value == 0 || value == 255)
    }

    /// Luminance-only layout, or every sampled colour has equal channels.
    pub fn is_grayscale(&self) -> bool {
        self.mode.is_luma() || self.colours.iter().all(|[r, g, b]| r == g && g == b)
    }

    /// Average colour with channels normalized to [0, 1].
    pub fn average_colour(&self) -> Srgb<f32> {
        let [r, g, b] = self.channel_means.map(|m| (m / 255.0) as f32);
        Srgb::new(r, g, b)
    }
}

/// Something that can summarize an image file.
pub trait ImageProvider {
    /// Inspect the image at `path`, failing if it can't be decoded.
    fn inspect(&self, path: &Path) -> Result<ImageInfo>;
}

/// Fill in a record's image-derived metadata.
///
/// A diffuse or addition map that can't be read fails the whole record.
pub fn analyze(record: &mut ShaderRecord, provider: &impl ImageProvider) -> Result<()> {
    let diffuse = record
        .map_path(MapType::Diffuse)
        .ok_or_else(|| SlothError::Generate {
            message: format!("Shader {} has no diffuse map", record.name),
            help: None,
        })?;

    let info = provider.inspect(&diffuse)?;
    record.meta.diffuse_alpha = info.has_meaningful_alpha();
    record.meta.alpha_binary = record.meta.diffuse_alpha && info.alpha_is_binary();

    record.meta.addition_grayscale = false;
    record.meta.addition_colour = None;

    if let Some(addition) = record.map_path(MapType::Addition) {
        let info = provider.inspect(&addition)?;
        record.meta.addition_grayscale = info.is_grayscale();

        if record.options.precalc_colours {
            record.meta.addition_colour = Some(info.average_colour());
        }
    }

    Ok(())
}
