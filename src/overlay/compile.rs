//! Turning a parsed option file into validated option changes.

use crate::diagnostics::{Diagnostic, Diagnostics, Kind};
use crate::error::SlothError;
use crate::parser::{parse_int_token, Entry, Section, SlothFile};
use crate::types::{
    light_intensity, parse_named_colour, AlphaFunc, AlphaTest, KeywordValue, Renderer,
};

use super::{KeywordSection, OptionChange, OptionOverlay};

/// Compile a parsed option file.
///
/// Unknown sections and option keys are reported as errors. A malformed
/// value drops only that entry; the rest of the file still applies.
pub fn compile(file: &SlothFile, origin: &str, diagnostics: &mut Diagnostics) -> OptionOverlay {
    let mut changes = Vec::new();

    for section in &file.sections {
        if section.name == "options" {
            for entry in &section.entries {
                let mut report = |kind: Kind, e: SlothError| {
                    diagnostics.push(located(Diagnostic::new(kind, message_of(&e)), origin, entry));
                };
                if let Some(change) = compile_option(entry, &mut report) {
                    changes.push(change);
                }
            }
        } else if let Some(kind) = KeywordSection::from_name(&section.name) {
            compile_keywords(section, kind, &mut changes);
        } else {
            diagnostics.push(
                Diagnostic::new(
                    Kind::InvalidSection,
                    format!("{}:{}: unknown section [{}]", origin, section.line, section.name),
                )
                .with_help("Known sections are options, keywords, addKeywords and delKeywords"),
            );
        }
    }

    OptionOverlay {
        origin: origin.to_string(),
        changes,
    }
}

fn compile_option(
    entry: &Entry,
    report: &mut impl FnMut(Kind, SlothError),
) -> Option<OptionChange> {
    let key = entry.key.as_str();

    match key {
        "colors" | "addColors" => {
            let mut colours = Vec::new();
            for token in entry.tokens() {
                match parse_named_colour(token) {
                    Ok(colour) => colours.push(colour),
                    Err(e) => report(Kind::InvalidColour, e),
                }
            }
            Some(OptionChange::Colours {
                replace: key == "colors",
                colours,
            })
        }
        "customLights" | "addCustomLights" | "predefLights" | "addPredefLights" => {
            let mut intensities = Vec::new();
            for token in entry.tokens() {
                match parse_int_token(token).and_then(light_intensity) {
                    Ok(intensity) => intensities.push(intensity),
                    Err(e) => report(Kind::InvalidIntensity, e),
                }
            }
            Some(OptionChange::Lights {
                custom: key.ends_with("ustomLights"),
                replace: !key.starts_with("add"),
                intensities,
            })
        }
        "colorBlendExp" => value(entry.as_f64(), report).map(OptionChange::ColourBlendExp),
        "heightNormalsMod" => value(entry.as_f64(), report).map(OptionChange::HeightNormalsMod),
        "alphaShadows" => value(entry.as_bool(), report).map(OptionChange::AlphaShadows),
        "guessKeywords" => value(entry.as_bool(), report).map(OptionChange::GuessKeywords),
        "precalcColors" => value(entry.as_bool(), report).map(OptionChange::PrecalcColours),
        "alphaFunc" => {
            if entry.raw() == "none" {
                return Some(OptionChange::AlphaTest(None));
            }
            value(entry.raw().parse::<AlphaFunc>(), report)
                .map(|func| OptionChange::AlphaTest(Some(AlphaTest::Func(func))))
        }
        "alphaTest" => value(entry.as_f64().and_then(AlphaTest::threshold), report)
            .map(|test| OptionChange::AlphaTest(Some(test))),
        "renderer" => match entry.raw().parse::<Renderer>() {
            Ok(renderer) => Some(OptionChange::Renderer(renderer)),
            Err(e) => {
                report(Kind::UnsupportedRenderer, e);
                None
            }
        },
        "editorOpacity" => {
            if entry.raw() == "none" {
                return Some(OptionChange::EditorOpacity(None));
            }
            let opacity = entry.as_f64().and_then(|v| {
                if (0.0..=1.0).contains(&v) {
                    Ok(v)
                } else {
                    Err(SlothError::Config {
                        message: format!("Editor opacity {} is outside 0..1", v),
                        help: None,
                    })
                }
            });
            value(opacity, report).map(|v| OptionChange::EditorOpacity(Some(v)))
        }
        _ => {
            report(
                Kind::InvalidOption,
                SlothError::Config {
                    message: format!("unknown option '{}'", key),
                    help: Some("Run `sloth example-config` for the list of options".to_string()),
                },
            );
            None
        }
    }
}

fn value<T>(result: crate::error::Result<T>, report: &mut impl FnMut(Kind, SlothError)) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            report(Kind::InvalidValue, e);
            None
        }
    }
}

fn compile_keywords(section: &Section, kind: KeywordSection, changes: &mut Vec<OptionChange>) {
    for entry in &section.entries {
        let value = match &entry.value {
            None => KeywordValue::Bare,
            Some(_) => KeywordValue::values(entry.tokens()),
        };

        changes.push(OptionChange::Keyword {
            section: kind,
            key: entry.key.clone(),
            value,
        });
    }
}

fn message_of(e: &SlothError) -> String {
    match e {
        SlothError::Parse { message, .. } | SlothError::Config { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

fn located(diagnostic: Diagnostic, origin: &str, entry: &Entry) -> Diagnostic {
    Diagnostic {
        message: format!("{}:{}: {}", origin, entry.line, diagnostic.message),
        ..diagnostic
    }
}
