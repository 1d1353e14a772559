//! Reported problems and the collector they go into.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Broad class of a reported problem, which decides how much work is lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A bad or conflicting value. Only that value is dropped.
    Config,
    /// An options file that can't be read. The whole file is skipped.
    Io,
    /// A map that can't be decoded. The shader is skipped.
    Image,
    /// An unknown set or shader asked for at emission. Nothing is emitted.
    Lookup,
}

/// Every problem sloth reports without failing the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    InvalidOption,
    InvalidSection,
    InvalidValue,
    InvalidColour,
    InvalidIntensity,
    UnsupportedRenderer,
    Syntax,
    Conflict,
    NameCollision,
    Unreadable,
    Decode,
    UnknownSet,
    UnknownShader,
}

impl Kind {
    pub fn class(self) -> ErrorClass {
        match self {
            Kind::InvalidOption
            | Kind::InvalidSection
            | Kind::InvalidValue
            | Kind::InvalidColour
            | Kind::InvalidIntensity
            | Kind::UnsupportedRenderer
            | Kind::Syntax
            | Kind::Conflict
            | Kind::NameCollision => ErrorClass::Config,
            Kind::Unreadable => ErrorClass::Io,
            Kind::Decode => ErrorClass::Image,
            Kind::UnknownSet | Kind::UnknownShader => ErrorClass::Lookup,
        }
    }

    /// Overwrites are recovered silently by keeping the newer value.
    pub fn severity(self) -> Severity {
        match self {
            Kind::Conflict | Kind::NameCollision => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Stable code shown next to the message, e.g. `sloth::config::conflict`.
    pub fn code(self) -> &'static str {
        match self {
            Kind::InvalidOption => "sloth::config::invalid-option",
            Kind::InvalidSection => "sloth::config::invalid-section",
            Kind::InvalidValue => "sloth::config::invalid-value",
            Kind::InvalidColour => "sloth::config::invalid-colour",
            Kind::InvalidIntensity => "sloth::config::invalid-intensity",
            Kind::UnsupportedRenderer => "sloth::config::unsupported-renderer",
            Kind::Syntax => "sloth::config::syntax",
            Kind::Conflict => "sloth::config::conflict",
            Kind::NameCollision => "sloth::generate::name-collision",
            Kind::Unreadable => "sloth::io::unreadable",
            Kind::Decode => "sloth::image::decode",
            Kind::UnknownSet => "sloth::emit::unknown-set",
            Kind::UnknownShader => "sloth::emit::unknown-shader",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: Kind,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

/// Collector owned by the caller of the pipeline.
///
/// Nothing here aborts work; the caller inspects the collected problems and
/// decides whether the run failed.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    reported: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.reported.push(diagnostic);
    }

    /// Report a problem without help text.
    pub fn report(&mut self, kind: Kind, message: impl Into<String>) {
        self.push(Diagnostic::new(kind, message));
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.reported.extend(other.reported);
    }

    /// Nothing was reported.
    pub fn is_ok(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reported.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reported.is_empty()
    }

    pub fn contains(&self, kind: Kind) -> bool {
        self.reported.iter().any(|d| d.kind == kind)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.reported.iter().filter(|d| d.severity() == severity).count()
    }

    pub fn in_class(&self, class: ErrorClass) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter().filter(move |d| d.class() == class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.reported.iter()
    }
}
