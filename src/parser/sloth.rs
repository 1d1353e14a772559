//! Options file (`.sloth`) reader.
//!
//! Parses the line-oriented section format used by per-directory and
//! per-shader option files:
//!
//! ```text
//! # comment
//! [options]
//! alphaShadows = off
//! colors = red:ff0000 green:00ff00
//!
//! [addKeywords]
//! surfaceparm = metalsteps
//! nomipmaps
//! ```
//!
//! The reader only knows about sections and entries. Interpreting them is
//! left to the overlay resolver.

use std::path::Path;

use crate::error::{SlothError, Result};

/// A parsed options file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlothFile {
    /// Sections in file order.
    pub sections: Vec<Section>,
}

/// A `[name]` section and its entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
    /// 1-based line of the section header.
    pub line: usize,
}

/// A single `key = value` entry, or a presence-only `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    pub value: Option<String>,
    /// 1-based line the entry starts on.
    pub line: usize,
}

impl SlothFile {
    /// Read and parse an options file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SlothError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read options file: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse options file content.
    pub fn parse(source: &str) -> Result<Self> {
        let mut sections: Vec<Section> = Vec::new();

        for (index, raw) in source.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            // Indented lines continue the previous value
            let indented = raw.starts_with(' ') || raw.starts_with('\t');
            if indented {
                if let Some(entry) = sections.last_mut().and_then(|s| s.entries.last_mut()) {
                    match &mut entry.value {
                        Some(value) => {
                            value.push(' ');
                            value.push_str(trimmed);
                        }
                        None => entry.value = Some(trimmed.to_string()),
                    }
                    continue;
                }
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| SlothError::Parse {
                    message: format!("line {}: unterminated section header", line_no),
                    help: Some("Section headers look like [options]".to_string()),
                })?;
                let name = name.trim();

                if sections.iter().any(|s| s.name == name) {
                    return Err(SlothError::Parse {
                        message: format!("line {}: duplicate section [{}]", line_no, name),
                        help: Some("Merge the entries into a single section".to_string()),
                    });
                }

                sections.push(Section {
                    name: name.to_string(),
                    entries: Vec::new(),
                    line: line_no,
                });
                continue;
            }

            let section = sections.last_mut().ok_or_else(|| SlothError::Parse {
                message: format!("line {}: entry outside of any section", line_no),
                help: Some("Start the file with a section header such as [options]".to_string()),
            })?;

            let (key, value) = split_entry(trimmed);

            if key.is_empty() {
                return Err(SlothError::Parse {
                    message: format!("line {}: missing key", line_no),
                    help: None,
                });
            }

            if section.entries.iter().any(|e| e.key == key) {
                return Err(SlothError::Parse {
                    message: format!(
                        "line {}: duplicate key '{}' in section [{}]",
                        line_no, key, section.name
                    ),
                    help: None,
                });
            }

            section.entries.push(Entry {
                key: key.to_string(),
                value: value.map(|v| v.to_string()),
                line: line_no,
            });
        }

        Ok(Self { sections })
    }

    /// Get a section by name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }
}

impl Section {
    /// Get an entry by key.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }
}

impl Entry {
    /// The raw value, or an empty string for presence-only entries.
    pub fn raw(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Whitespace-separated value tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.raw().split_whitespace()
    }

    /// Parse the value as a float.
    pub fn as_f64(&self) -> Result<f64> {
        self.raw().trim().parse::<f64>().map_err(|_| SlothError::Parse {
            message: format!("'{}' is not a number (key '{}')", self.raw(), self.key),
            help: None,
        })
    }

    /// Parse the value as an integer.
    pub fn as_i64(&self) -> Result<i64> {
        self.raw().trim().parse::<i64>().map_err(|_| SlothError::Parse {
            message: format!("'{}' is not an integer (key '{}')", self.raw(), self.key),
            help: None,
        })
    }

    /// Parse the value as a boolean.
    ///
    /// Accepts `1/yes/true/on` and `0/no/false/off`, ignoring case.
    pub fn as_bool(&self) -> Result<bool> {
        match self.raw().trim().to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Ok(true),
            "0" | "no" | "false" | "off" => Ok(false),
            _ => Err(SlothError::Parse {
                message: format!("'{}' is not a boolean (key '{}')", self.raw(), self.key),
                help: Some("Use on/off, yes/no, true/false or 1/0".to_string()),
            }),
        }
    }
}

/// Split `key = value` / `key: value` at the first delimiter.
///
/// Empty values are treated as presence-only.
fn split_entry(line: &str) -> (&str, Option<&str>) {
    match line.find(['=', ':']) {
        Some(pos) => {
            let key = line[..pos].trim();
            let value = line[pos + 1..].trim();
            (key, (!value.is_empty()).then_some(value))
        }
        None => (line, None),
    }
}

/// Parse a single integer token.
pub fn parse_int_token(token: &str) -> Result<i64> {
    token.parse::<i64>().map_err(|_| SlothError::Parse {
        message: format!("'{}' is not an integer", token),
        help: None,
    })
}
