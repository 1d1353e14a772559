//! Reported-error channel for sloth.
//!
//! Configuration mistakes, unreadable option files, undecodable images and
//! unknown emission targets are collected here instead of aborting the run.
//! The caller decides whether to print, inspect or fail on them.

mod diagnostic;

pub use diagnostic::{Diagnostic, Diagnostics, ErrorClass, Kind, Severity};

use crate::output::{plural, Printer};

/// Print collected diagnostics to stderr.
pub fn print_diagnostics(diagnostics: &Diagnostics, printer: &Printer) {
    for d in diagnostics.iter() {
        let severity = d.severity();
        let label = printer.severity(&severity.to_string(), severity == Severity::Error);
        eprintln!("{}[{}]: {}", label, d.kind, d.message);
        if let Some(help) = &d.help {
            eprintln!("  {} {}", printer.dim("help:"), help);
        }
    }

    let skipped = diagnostics.in_class(ErrorClass::Image).count();
    if skipped > 0 {
        printer.warning("Skipped", &plural(skipped, "shader", "shaders"));
    }

    let errors = diagnostics.count(Severity::Error);
    let warnings = diagnostics.count(Severity::Warning);

    if errors > 0 {
        printer.error(
            "Reported",
            &format!(
                "{}, {}",
                plural(errors, "error", "errors"),
                plural(warnings, "warning", "warnings")
            ),
        );
    } else if warnings > 0 {
        printer.warning("Reported", &plural(warnings, "warning", "warnings"));
    }
}
