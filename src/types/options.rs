//! Generation options that can be overridden per directory and per shader.
//!
//! An `OptionBundle` is a plain value: every shader owns its own clone, so
//! overlaying one shader's options never leaks into the defaults, the
//! directory bundle, or a sibling shader.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{SlothError, Result};

use super::colour::LightColour;
use super::keywords::KeywordOverlay;

/// Target renderer for the generated shader script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Renderer {
    /// Vanilla Quake 3 stages only.
    Quake3,
    /// XreaL collapsed map keywords.
    #[default]
    Xreal,
    /// Daemon grouped material stages.
    Daemon,
}

impl Renderer {
    pub const ALL: [Renderer; 3] = [Renderer::Quake3, Renderer::Xreal, Renderer::Daemon];

    pub fn name(self) -> &'static str {
        match self {
            Renderer::Quake3 => "quake3",
            Renderer::Xreal => "xreal",
            Renderer::Daemon => "daemon",
        }
    }
}

impl FromStr for Renderer {
    type Err = SlothError;

    fn from_str(s: &str) -> Result<Self> {
        Renderer::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| SlothError::Config {
                message: format!("Renderer {} not supported", s),
                help: Some("Supported renderers are quake3, xreal and daemon".to_string()),
            })
    }
}

impl fmt::Display for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named alpha comparison functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlphaFunc {
    Gt0,
    Ge128,
    Lt128,
}

impl AlphaFunc {
    pub fn name(self) -> &'static str {
        match self {
            AlphaFunc::Gt0 => "GT0",
            AlphaFunc::Ge128 => "GE128",
            AlphaFunc::Lt128 => "LT128",
        }
    }
}

impl FromStr for AlphaFunc {
    type Err = SlothError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "GT0" => Ok(AlphaFunc::Gt0),
            "GE128" => Ok(AlphaFunc::Ge128),
            "LT128" => Ok(AlphaFunc::Lt128),
            _ => Err(SlothError::Config {
                message: format!("Unknown alpha function {}", s),
                help: Some("Use GT0, GE128, LT128 or none".to_string()),
            }),
        }
    }
}

/// How transparent diffuse maps are cut instead of blended smoothly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaTest {
    /// `alphaFunc <name>`
    Func(AlphaFunc),
    /// `alphaTest <threshold>`, threshold in [0, 1].
    Threshold(f64),
}

impl AlphaTest {
    /// Build a threshold test, rejecting values outside [0, 1].
    pub fn threshold(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(AlphaTest::Threshold(value))
        } else {
            Err(SlothError::Config {
                message: format!("Alpha test threshold {} is outside 0..1", value),
                help: None,
            })
        }
    }
}

/// Bucket a light intensity into its variant name.
///
/// `0` is "norad", values of 10000 and above are written in thousands
/// ("12k"), everything else is the plain number.
pub fn intensity_name(intensity: u32) -> String {
    if intensity == 0 {
        "norad".to_string()
    } else if intensity >= 10000 {
        format!("{}k", intensity / 1000)
    } else {
        intensity.to_string()
    }
}

/// Validate a raw intensity value.
pub fn light_intensity(value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| SlothError::Config {
        message: format!("Ignoring invalid light intensity {}", value),
        help: Some("Light intensities are non-negative integers".to_string()),
    })
}

/// All tunable generation parameters for a shader.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionBundle {
    /// Colour name → colour; used with grayscale addition maps.
    pub light_colours: BTreeMap<String, LightColour>,
    /// Intensity name → intensity; used with grayscale addition maps.
    pub custom_lights: BTreeMap<String, u32>,
    /// Intensity name → intensity; used with pre-coloured addition maps.
    pub predef_lights: BTreeMap<String, u32>,
    /// Guess surface parameters from the shader name.
    pub guess_keywords: bool,
    /// Exponent turning light colour channels into addition stage modifiers.
    pub colour_blend_exp: f64,
    /// Modifier for normals generated from height maps; <= 0 disables it.
    pub height_normals_mod: f64,
    /// Alpha cut instead of smooth blending.
    pub alpha_test: Option<AlphaTest>,
    /// Add the alphashadows surfaceparm to transparent shaders.
    pub alpha_shadows: bool,
    pub renderer: Renderer,
    /// Compute the average addition map colour for surface lights.
    pub precalc_colours: bool,
    /// In-editor opacity hint (`qer_trans`).
    pub editor_opacity: Option<f64>,
    pub keywords: KeywordOverlay,
}

impl Default for OptionBundle {
    fn default() -> Self {
        let mut bundle = Self::empty();
        bundle.light_colours.insert("white".to_string(), LightColour::WHITE);
        for intensity in [1000, 2000, 4000] {
            bundle.custom_lights.insert(intensity_name(intensity), intensity);
        }
        for intensity in [0, 200] {
            bundle.predef_lights.insert(intensity_name(intensity), intensity);
        }
        bundle
    }
}

impl OptionBundle {
    /// Defaults without any light colours or intensities.
    pub fn empty() -> Self {
        Self {
            light_colours: BTreeMap::new(),
            custom_lights: BTreeMap::new(),
            predef_lights: BTreeMap::new(),
            guess_keywords: false,
            colour_blend_exp: 1.0,
            height_normals_mod: 1.0,
            alpha_test: None,
            alpha_shadows: true,
            renderer: Renderer::default(),
            precalc_colours: false,
            editor_opacity: None,
            keywords: KeywordOverlay::default(),
        }
    }

    /// Add or overwrite a named light colour.
    ///
    /// Returns the previous colour if a different one was replaced.
    pub fn add_light_colour(&mut self, name: &str, colour: LightColour) -> Option<LightColour> {
        self.light_colours
            .insert(name.to_string(), colour)
            .filter(|previous| *previous != colour)
    }

    /// Add a light intensity to the custom or predefined bucket.
    ///
    /// Returns the previous intensity if its bucket name was already taken
    /// by a different value.
    pub fn add_light_intensity(&mut self, intensity: u32, custom: bool) -> Option<u32> {
        let lights = if custom {
            &mut self.custom_lights
        } else {
            &mut self.predef_lights
        };

        lights
            .insert(intensity_name(intensity), intensity)
            .filter(|previous| *previous != intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intensity_name() {
        assert_eq!(intensity_name(0), "norad");
        assert_eq!(intensity_name(200), "200");
        assert_eq!(intensity_name(9999), "9999");
        assert_eq!(intensity_name(10000), "10k");
        assert_eq!(intensity_name(12500), "12k");
    }

    #[test]
    fn test_light_intensity_rejects_negative() {
        assert!(light_intensity(-1).is_err());
        assert_eq!(light_intensity(500).unwrap(), 500);
    }

    #[test]
    fn test_renderer_parse() {
        assert_eq!("daemon".parse::<Renderer>().unwrap(), Renderer::Daemon);
        assert_eq!("quake3".parse::<Renderer>().unwrap(), Renderer::Quake3);
        assert!("Daemon".parse::<Renderer>().is_err());
        assert!("doom3".parse::<Renderer>().is_err());
        assert_eq!(Renderer::default(), Renderer::Xreal);
    }

    #[test]
    fn test_alpha_func_parse() {
        assert_eq!("GE128".parse::<AlphaFunc>().unwrap(), AlphaFunc::Ge128);
        assert!("ge128".parse::<AlphaFunc>().is_err());
    }

    #[test]
    fn test_alpha_threshold_range() {
        assert!(AlphaTest::threshold(0.5).is_ok());
        assert!(AlphaTest::threshold(0.0).is_ok());
        assert!(AlphaTest::threshold(1.5).is_err());
        assert!(AlphaTest::threshold(-0.1).is_err());
    }

    #[test]
    fn test_default_bundle() {
        let bundle = OptionBundle::default();
        assert_eq!(bundle.light_colours.get("white"), Some(&LightColour::WHITE));
        assert_eq!(bundle.custom_lights.len(), 3);
        assert_eq!(bundle.predef_lights.get("norad"), Some(&0));
        assert!(bundle.alpha_shadows);
        assert_eq!(bundle.renderer, Renderer::Xreal);
    }

    #[test]
    fn test_add_light_colour_reports_conflict() {
        let mut bundle = OptionBundle::empty();
        assert_eq!(bundle.add_light_colour("red", LightColour::rgb(255, 0, 0)), None);
        assert_eq!(bundle.add_light_colour("red", LightColour::rgb(255, 0, 0)), None);
        assert_eq!(
            bundle.add_light_colour("red", LightColour::rgb(200, 0, 0)),
            Some(LightColour::rgb(255, 0, 0))
        );
        assert_eq!(bundle.light_colours["red"], LightColour::rgb(200, 0, 0));
    }

    #[test]
    fn test_add_light_intensity_buckets() {
        let mut bundle = OptionBundle::empty();
        assert_eq!(bundle.add_light_intensity(12000, true), None);
        assert_eq!(bundle.add_light_intensity(12500, true), Some(12000));
        assert_eq!(bundle.custom_lights["12k"], 12500);
        assert!(bundle.predef_lights.is_empty());
    }
}
