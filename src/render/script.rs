//! Shader block rendering.
//!
//! Everything is written through `fmt::Display`, so a block can go straight
//! into a `String` or a file.

use std::fmt::{self, Display, Formatter};

use palette::Srgb;

use crate::types::{AlphaFunc, AlphaTest, KeywordTable, KeywordValue, MapType, Renderer, ShaderRecord};

/// Column at which shader-level values start.
const KEYWORD_WIDTH: usize = 20;

/// Column at which values inside a grouped stage start.
const STAGE_WIDTH: usize = 16;

fn padded(f: &mut Formatter<'_>, indent: &str, key: &str, width: usize, value: impl Display) -> fmt::Result {
    let pad = width.saturating_sub(key.len()).max(1);
    writeln!(f, "{}{}{:pad$}{}", indent, key, "", value, pad = pad)
}

/// Keyword lines of a table, one line per value, keys in sorted order.
pub struct KeywordLines<'a>(pub &'a KeywordTable);

impl Display for KeywordLines<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (key, value) in self.0.iter() {
            match value {
                KeywordValue::Bare => writeln!(f, "\t{}", key)?,
                KeywordValue::Values(values) => {
                    for v in values {
                        padded(f, "\t", key, KEYWORD_WIDTH, v)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// One `set/name { ... }` block.
pub struct ShaderBlock<'a> {
    pub set: &'a str,
    pub record: &'a ShaderRecord,
}

impl<'a> ShaderBlock<'a> {
    pub fn new(set: &'a str, record: &'a ShaderRecord) -> Self {
        Self { set, record }
    }

    fn path(&self, map_type: MapType) -> Option<String> {
        self.record.script_path(map_type)
    }

    /// Alpha blended smoothly rather than cut.
    fn blends_smoothly(&self) -> bool {
        let meta = &self.record.meta;
        meta.diffuse_alpha && self.record.options.alpha_test.is_none() && !meta.alpha_binary
    }

    /// Light colour scaled to [0, 1], if one was assigned.
    fn light_colour(&self) -> Option<Srgb<f32>> {
        self.record.meta.light_colour.map(|c| c.to_unit())
    }

    /// `normalMap` value: the normal map, a height map converted to normals,
    /// or both added together.
    fn normal_expression(&self) -> Option<String> {
        let modifier = self.record.options.height_normals_mod;
        let height = self.path(MapType::Height).filter(|_| modifier > 0.0);
        let normal = self
            .path(MapType::Normal)
            .or_else(|| self.path(MapType::NormalHeight));

        match (normal, height) {
            (Some(n), Some(h)) => Some(format!("addnormals ( {}, heightmap ( {}, {:.2} ) )", n, h, modifier)),
            (Some(n), None) => Some(n),
            (None, Some(h)) => Some(format!("heightmap ( {}, {:.2} )", h, modifier)),
            (None, None) => None,
        }
    }

    fn write_preview(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let preview = self.path(MapType::Preview).or_else(|| self.path(MapType::Diffuse));

        if let Some(preview) = preview {
            padded(f, "\t", "qer_editorImage", KEYWORD_WIDTH, preview)?;
            if let Some(opacity) = self.record.options.editor_opacity {
                padded(f, "\t", "qer_trans", KEYWORD_WIDTH, format_args!("{:.2}", opacity))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_keywords(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if !self.record.keywords.is_empty() {
            write!(f, "{}", KeywordLines(&self.record.keywords))?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_surface_light(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let intensity = match self.record.meta.light_intensity {
            Some(i) if i > 0 => i,
            _ => return Ok(()),
        };

        padded(f, "\t", "q3map_surfacelight", KEYWORD_WIDTH, intensity)?;

        let rgb = |c: Srgb<f32>| format!("{:.2} {:.2} {:.2}", c.red, c.green, c.blue);
        let colour = self.light_colour().or(self.record.meta.addition_colour);

        if let Some(colour) = colour {
            padded(f, "\t", "q3map_lightRGB", KEYWORD_WIDTH, rgb(colour))?;
        } else if let Some(image) = self.path(MapType::Addition).or_else(|| self.path(MapType::Diffuse)) {
            padded(f, "\t", "q3map_lightImage", KEYWORD_WIDTH, image)?;
        } else {
            padded(f, "\t", "q3map_lightRGB", KEYWORD_WIDTH, "1.00 1.00 1.00")?;
        }

        writeln!(f)
    }

    fn write_xreal(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(diffuse) = self.path(MapType::Diffuse) {
            if self.blends_smoothly() {
                writeln!(f, "\t{{")?;
                writeln!(f, "\t\tmap   {}", diffuse)?;
                writeln!(f, "\t\tblend blend")?;
                writeln!(f, "\t}}")?;
            } else {
                padded(f, "\t", "diffuseMap", KEYWORD_WIDTH, diffuse)?;
            }
        }

        if let Some(normal) = self.normal_expression() {
            padded(f, "\t", "normalMap", KEYWORD_WIDTH, normal)?;
        }

        if let Some(specular) = self.path(MapType::Specular) {
            padded(f, "\t", "specularMap", KEYWORD_WIDTH, specular)?;
        }
        Ok(())
    }

    fn write_daemon(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(diffuse) = self.path(MapType::Diffuse) else {
            return Ok(());
        };

        writeln!(f, "\t{{")?;
        padded(f, "\t\t", "diffuseMap", STAGE_WIDTH, diffuse)?;

        let normal_height = self.path(MapType::NormalHeight);
        match normal_height.filter(|_| !self.record.maps.has(MapType::Normal)) {
            Some(nh) => padded(f, "\t\t", "normalHeightMap", STAGE_WIDTH, nh)?,
            None => {
                if let Some(normal) = self.normal_expression() {
                    padded(f, "\t\t", "normalMap", STAGE_WIDTH, normal)?;
                }
            }
        }

        if let Some(specular) = self.path(MapType::Specular) {
            padded(f, "\t\t", "specularMap", STAGE_WIDTH, specular)?;
        }
        if let Some(physical) = self.path(MapType::Physical) {
            padded(f, "\t\t", "physicalMap", STAGE_WIDTH, physical)?;
        }
        if self.blends_smoothly() {
            padded(f, "\t\t", "blendFunc", STAGE_WIDTH, "blend")?;
        }

        writeln!(f, "\t}}")
    }

    fn write_quake3(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(diffuse) = self.path(MapType::Diffuse) else {
            return Ok(());
        };

        writeln!(f, "\t{{")?;
        writeln!(f, "\t\tmap       {}", diffuse)?;

        if self.blends_smoothly() {
            writeln!(f, "\t\tblendFunc blend")?;
        } else if self.record.meta.diffuse_alpha {
            // Quake 3 stages only know the named comparisons
            let func = match self.record.options.alpha_test {
                Some(AlphaTest::Func(func)) => func,
                Some(AlphaTest::Threshold(t)) if t <= 0.0 => AlphaFunc::Gt0,
                _ => AlphaFunc::Ge128,
            };
            writeln!(f, "\t\talphaFunc {}", func.name())?;
        }

        writeln!(f, "\t}}")
    }

    fn write_addition(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(addition) = self.path(MapType::Addition) else {
            return Ok(());
        };

        let renderer = self.record.options.renderer;
        let tint = self
            .record
            .meta
            .light_colour
            .filter(|c| !c.is_white())
            .map(|c| c.to_unit());

        if renderer == Renderer::Daemon && tint.is_none() {
            return padded(f, "\t", "glowMap", KEYWORD_WIDTH, addition);
        }

        writeln!(f, "\t{{")?;

        if renderer == Renderer::Quake3 {
            writeln!(f, "\t\tmap       {}", addition)?;
            writeln!(f, "\t\tblendFunc add")?;
        } else {
            writeln!(f, "\t\tmap   {}", addition)?;
            writeln!(f, "\t\tblend add")?;
        }

        if let Some(colour) = tint {
            let exp = self.record.options.colour_blend_exp as f32;
            let [r, g, b] = [colour.red, colour.green, colour.blue].map(|c| c.powf(exp));

            if renderer == Renderer::Quake3 {
                writeln!(f, "\t\trgbGen    const ( {:.2} {:.2} {:.2} )", r, g, b)?;
            } else {
                writeln!(f, "\t\tred   {:.2}", r)?;
                writeln!(f, "\t\tgreen {:.2}", g)?;
                writeln!(f, "\t\tblue  {:.2}", b)?;
            }
        }

        writeln!(f, "\t}}")
    }
}

impl Display for ShaderBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}/{}", self.set, self.record.name)?;
        writeln!(f, "{{")?;

        self.write_preview(f)?;
        self.write_keywords(f)?;
        self.write_surface_light(f)?;

        match self.record.options.renderer {
            Renderer::Xreal => self.write_xreal(f)?,
            Renderer::Daemon => self.write_daemon(f)?,
            Renderer::Quake3 => self.write_quake3(f)?,
        }

        self.write_addition(f)?;

        writeln!(f, "}}")
    }
}
