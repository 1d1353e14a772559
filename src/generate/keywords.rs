//! Keyword assembly.

use crate::types::{AlphaFunc, AlphaTest, KeywordValue, ShaderRecord};

/// Surface parameters guessed from words in the shader name.
///
/// Matching is a plain substring test, so `ironwork` and `environment` both
/// count as `iron`.
pub const SURFACE_PARM_GUESSES: &[(&str, &[&str])] = &[
    ("donotenter", &["lava", "slime"]),
    ("dust", &["sand", "dust"]),
    ("flesh", &["flesh", "meat", "organ"]),
    ("ladder", &["ladder"]),
    ("lava", &["lava"]),
    ("metalsteps", &["metal", "steel", "iron", "tread", "grate"]),
    ("slick", &["ice"]),
    ("slime", &["slime"]),
    ("water", &["water"]),
];

/// Surface parameters whose trigger words occur in `name`.
pub fn guess_surface_parms(name: &str) -> impl Iterator<Item = &'static str> + '_ {
    SURFACE_PARM_GUESSES
        .iter()
        .filter(move |(_, words)| words.iter().any(|word| name.contains(*word)))
        .map(|(parm, _)| *parm)
}

/// Build the keyword table of a record from its metadata and options.
///
/// Steps run in a fixed order and only add or overwrite:
///
/// 1. transparency keywords for a diffuse map with alpha,
/// 2. guessed surface parameters,
/// 3. the resolved `keywords`, `addKeywords` and `delKeywords` overlays.
///
/// An explicitly configured alpha test takes precedence over the hard
/// cutoff implied by a binary alpha channel.
pub fn assemble_keywords(record: &mut ShaderRecord) {
    let options = &record.options;
    let keywords = &mut record.keywords;

    if record.meta.diffuse_alpha {
        keywords.insert_value("surfaceparm", "trans");
        keywords.set("cull", KeywordValue::single("none"));

        match options.alpha_test {
            Some(AlphaTest::Func(func)) => {
                keywords.set("alphaFunc", KeywordValue::single(func.name()));
            }
            Some(AlphaTest::Threshold(threshold)) => {
                keywords.set("alphaTest", KeywordValue::single(format!("{:.2}", threshold)));
            }
            None if record.meta.alpha_binary => {
                keywords.set("alphaFunc", KeywordValue::single(AlphaFunc::Ge128.name()));
            }
            None => {}
        }

        if options.alpha_shadows {
            keywords.insert_value("surfaceparm", "alphashadows");
        }
    }

    if options.guess_keywords {
        for parm in guess_surface_parms(&record.name) {
            keywords.insert_value("surfaceparm", parm);
        }
    }

    options.keywords.apply(keywords);
}
