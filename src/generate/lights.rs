//! Light variant expansion.
//!
//! A shader with an addition map becomes one glowing variant per configured
//! light plus a non-glowing `<name>_off` fallback. Grayscale addition maps
//! can be tinted, so they get every (colour, custom intensity) pair; coloured
//! addition maps only get the predefined intensities.

use crate::types::{MapType, ShaderRecord};

/// Name suffix of the non-glowing fallback.
pub const OFF_SUFFIX: &str = "_off";

/// Expand a record into its light variants.
///
/// Records without an addition map, or without any configured lights for
/// their kind of addition map, come back unchanged as the only element.
pub fn expand_lights(record: ShaderRecord) -> Vec<ShaderRecord> {
    if !record.maps.has(MapType::Addition) {
        return vec![record];
    }

    let options = &record.options;
    let mut variants = Vec::new();

    if record.meta.addition_grayscale {
        for (colour_name, colour) in &options.light_colours {
            for (intensity_name, intensity) in &options.custom_lights {
                let mut variant = record.clone();
                variant.name = format!("{}_{}_{}", record.name, colour_name, intensity_name);
                variant.meta.light_intensity = Some(*intensity);
                variant.meta.light_colour = Some(*colour);
                variants.push(variant);
            }
        }
    } else {
        for (intensity_name, intensity) in &options.predef_lights {
            let mut variant = record.clone();
            variant.name = format!("{}_{}", record.name, intensity_name);
            variant.meta.light_intensity = Some(*intensity);
            variants.push(variant);
        }
    }

    if variants.is_empty() {
        return vec![record];
    }

    let mut off = record;
    off.name = format!("{}{}", off.name, OFF_SUFFIX);
    off.maps = off.maps.without(MapType::Addition);
    variants.push(off);

    variants
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LightColour, MapFile, MapSet, OptionBundle, ShaderSource};
    use std::path::PathBuf;

    fn lamp(with_addition: bool, options: OptionBundle) -> ShaderRecord {
        let mut maps = MapSet::new();
        maps.insert(MapType::Diffuse, MapFile::new("lamp_d", "png"));
        if with_addition {
            maps.insert(MapType::Addition, MapFile::new("lamp_a", "png"));
        }
        let source = ShaderSource {
            rel_path: "textures/lights_src".to_string(),
            abs_path: PathBuf::from("/t/textures/lights_src"),
        };
        ShaderRecord::new("lamp", source, maps, options)
    }

    fn names(records: &[ShaderRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_grayscale_expansion() {
        let mut options = OptionBundle::empty();
        options.add_light_colour("red", LightColour::rgb(255, 0, 0));
        options.add_light_colour("blue", LightColour::rgb(0, 0, 255));
        for intensity in [500, 1000, 20000] {
            options.add_light_intensity(intensity, true);
        }
        let mut record = lamp(true, options);
        record.meta.addition_grayscale = true;

        let expanded = expand_lights(record);

        assert_eq!(expanded.len(), 7);
        assert_eq!(
            names(&expanded),
            vec![
                "lamp_blue_1000",
                "lamp_blue_20k",
                "lamp_blue_500",
                "lamp_red_1000",
                "lamp_red_20k",
                "lamp_red_500",
                "lamp_off",
            ]
        );

        let red = &expanded[4];
        assert_eq!(red.meta.light_intensity, Some(20000));
        assert_eq!(red.meta.light_colour, Some(LightColour::rgb(255, 0, 0)));
        assert!(red.maps.has(MapType::Addition));
    }

    #[test]
    fn test_coloured_expansion() {
        let mut options = OptionBundle::empty();
        for intensity in [0, 200, 400, 800] {
            options.add_light_intensity(intensity, false);
        }
        let expanded = expand_lights(lamp(true, options));

        assert_eq!(expanded.len(), 5);
        assert_eq!(
            names(&expanded),
            vec!["lamp_200", "lamp_400", "lamp_800", "lamp_norad", "lamp_off"]
        );
        assert!(expanded.iter().take(4).all(|r| r.meta.light_colour.is_none()));
        assert_eq!(expanded[3].meta.light_intensity, Some(0));
    }

    #[test]
    fn test_off_variant_drops_addition_map() {
        let expanded = expand_lights(lamp(true, OptionBundle::default()));
        let off = expanded.last().unwrap();

        assert_eq!(off.name, "lamp_off");
        assert!(!off.maps.has(MapType::Addition));
        assert!(off.maps.has(MapType::Diffuse));
        assert_eq!(off.meta.light_intensity, None);
    }

    #[test]
    fn test_no_addition_map_is_kept() {
        let expanded = expand_lights(lamp(false, OptionBundle::default()));

        assert_eq!(names(&expanded), vec!["lamp"]);
    }

    #[test]
    fn test_no_configured_lights_is_kept() {
        let mut record = lamp(true, OptionBundle::empty());
        record.meta.addition_grayscale = true;

        let expanded = expand_lights(record);

        assert_eq!(names(&expanded), vec!["lamp"]);
        assert!(expanded[0].maps.has(MapType::Addition));
    }

    #[test]
    fn test_variants_are_independent_copies() {
        let mut expanded = expand_lights(lamp(true, OptionBundle::default()));
        expanded[0].options.light_colours.clear();
        expanded[0].keywords.insert_value("surfaceparm", "nolightmap");

        assert_eq!(expanded[1].options.light_colours.len(), 1);
        assert!(expanded[1].keywords.is_empty());
    }
}
