//! Example options file.

/// A commented options file listing every section and key.
pub const EXAMPLE_CONFIG: &str = r#"# Options file for sloth.
#
# Command line flags set the defaults for every shader. A file named
# "options.sloth" inside a texture source directory changes them for that
# directory. Any other "<prefix>.sloth" file applies to every shader whose
# name starts with <prefix>; when several match, shorter prefixes are applied
# first, so "metal_rusty.sloth" overrides "metal.sloth".
#
# Section names and keys are case-sensitive.

[options]
# Light colours for grayscale addition maps; "colors" replaces the list,
# "addColors" adds to it. Colours are six lowercase hex digits.
#colors = red:ff0000 green:00ff00
#addColors = blue:0000ff

# Light intensities for grayscale addition maps (--custom-lights)
#customLights = 1000 2000 4000
#addCustomLights = 8000

# Light intensities for coloured addition maps (--predef-lights)
#predefLights = 0 200
#addPredefLights = 400

# Exponent applied to light colour channels in the addition stage
#colorBlendExp = 1.0

# Cut transparent diffuse maps instead of blending them smoothly.
# alphaFunc takes GT0, GE128, LT128 or none; alphaTest takes 0 to 1.
#alphaFunc = GE128
#alphaTest = 0.5

# Add the alphashadows surfaceparm to transparent shaders
#alphaShadows = on

# Strength of normals derived from height maps; 0 disables them
#heightNormalsMod = 1.0

# quake3, xreal or daemon
#renderer = daemon

# Guess surfaceparms from words in the shader name
#guessKeywords = off

# Use the average addition map colour as surface light colour
#precalcColors = off

# Opacity of the shader in the map editor, 0 to 1
#editorOpacity = 0.5

# Keywords to set, replacing any earlier value of the same keyword
[keywords]
#cull = none

# Keywords to add to
[addKeywords]
#surfaceparm = metalsteps nomarks
#nopicmip

# Keywords to remove; a keyword without values is removed entirely
[delKeywords]
#surfaceparm = alphashadows
#cull
"#;

pub fn run() -> crate::error::Result<()> {
    print!("{}", EXAMPLE_CONFIG);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostics, Kind};
    use crate::overlay::OptionOverlay;

    #[test]
    fn test_example_parses_cleanly() {
        let mut diagnostics = Diagnostics::new();
        let overlay = OptionOverlay::from_source(EXAMPLE_CONFIG, "example", &mut diagnostics).unwrap();

        assert!(diagnostics.is_ok());
        assert!(overlay.changes.is_empty());
    }

    #[test]
    fn test_example_keys_are_all_known() {
        let uncommented: String = EXAMPLE_CONFIG
            .lines()
            .map(|line| line.strip_prefix('#').filter(|l| !l.starts_with(' ') && !l.is_empty()).unwrap_or(line))
            .collect::<Vec<_>>()
            .join("\n");

        let mut diagnostics = Diagnostics::new();
        let overlay = OptionOverlay::from_source(&uncommented, "example", &mut diagnostics).unwrap();

        assert!(diagnostics.iter().all(|d| d.kind != Kind::InvalidOption));
        assert!(!overlay.changes.is_empty());
    }
}
