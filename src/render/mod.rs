//! Shader script emission.
//!
//! Turns generated sets into the text of a `.shader` file: an optional
//! comment header, then per set a banner and every shader block in name
//! order. The renderer configured for each shader decides how its maps are
//! grouped into stages.

mod script;

use std::fmt::{self, Display, Formatter};

use crate::diagnostics::{Diagnostic, Diagnostics, Kind};
use crate::registry::{ShaderRegistry, ShaderSet};

pub use script::{KeywordLines, ShaderBlock};

/// Which part of the registry to emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    /// Only this set.
    pub set: Option<&'a str>,
    /// Only shaders with this name. Banners are left out.
    pub shader: Option<&'a str>,
}

impl<'a> Selection<'a> {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn set(name: &'a str) -> Self {
        Self {
            set: Some(name),
            shader: None,
        }
    }

    pub fn shader(set: Option<&'a str>, name: &'a str) -> Self {
        Self {
            set,
            shader: Some(name),
        }
    }
}

/// Comment out header text line by line.
///
/// Lines already starting with `//` are kept as they are.
pub fn format_header(header: &str) -> String {
    let mut out = String::new();

    for line in header.lines() {
        if line.starts_with("//") {
            out.push_str(line);
        } else if line.is_empty() {
            out.push_str("//");
        } else {
            out.push_str("// ");
            out.push_str(line);
        }
        out.push('\n');
    }

    out
}

/// Set banner, framed by dashes as wide as the name.
struct Banner<'a>(&'a str);

impl Display for Banner<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(self.0.chars().count());
        writeln!(f)?;
        writeln!(f, "// {}", rule)?;
        writeln!(f, "// {}", self.0)?;
        writeln!(f, "// {}", rule)
    }
}

/// A resolved emission request.
pub struct ShaderScript<'a> {
    header: Option<&'a str>,
    sets: Vec<(&'a str, &'a ShaderSet)>,
    shader: Option<&'a str>,
}

impl<'a> ShaderScript<'a> {
    /// Resolve a selection against the registry.
    ///
    /// Unknown set or shader names are reported and yield `None`.
    pub fn new(
        registry: &'a ShaderRegistry,
        header: Option<&'a str>,
        selection: Selection<'a>,
        diagnostics: &mut Diagnostics,
    ) -> Option<Self> {
        let sets: Vec<(&str, &ShaderSet)> = match selection.set {
            Some(name) => match registry.get(name) {
                Some(set) => vec![(name, set)],
                None => {
                    diagnostics.push(
                        Diagnostic::new(Kind::UnknownSet, format!("Unknown set {}", name))
                            .with_help(known_sets(registry)),
                    );
                    return None;
                }
            },
            None => registry.iter().collect(),
        };

        if let Some(name) = selection.shader {
            if !sets.iter().any(|(_, set)| set.contains(name)) {
                diagnostics.report(Kind::UnknownShader, format!("Unknown shader {}", name));
                return None;
            }
        }

        Some(Self {
            header,
            sets,
            shader: selection.shader,
        })
    }
}

fn known_sets(registry: &ShaderRegistry) -> String {
    let names: Vec<&str> = registry.set_names().collect();
    if names.is_empty() {
        "No sets were generated".to_string()
    } else {
        format!("Known sets: {}", names.join(", "))
    }
}

impl Display for ShaderScript<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(header) = self.header {
            f.write_str(&format_header(header))?;
        }

        for (set_name, set) in &self.sets {
            match self.shader {
                Some(name) => {
                    if let Some(record) = set.get(name) {
                        write!(f, "{}", ShaderBlock::new(set_name, record))?;
                    }
                }
                None => {
                    write!(f, "{}", Banner(set_name))?;
                    for record in set.shaders() {
                        write!(f, "{}", ShaderBlock::new(set_name, record))?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Emit a selection of the registry as shader file text.
///
/// Returns `None` if the selection names an unknown set or shader.
pub fn emit(
    registry: &ShaderRegistry,
    header: Option<&str>,
    selection: Selection<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<String> {
    ShaderScript::new(registry, header, selection, diagnostics).map(|script| script.to_string())
}
