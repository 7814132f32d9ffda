// crates/dotconf-core/src/report.rs
// ============================================================================
// Module: Diagnostic Reporting
// Description: Severity levels, assignment provenance, and the reporter
//              capability threaded through the parser and schema engine.
// Purpose: Keep diagnostics purely observational and injectable.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Diagnostics are emitted through an explicit [`Reporter`] capability
//! rather than a global logger, so every caller decides where warnings go
//! and concurrent loads stay independent. A reporter is a side-effecting
//! observer only: it never raises and never alters control flow.
//!
//! [`Provenance`] records where an assignment came from (`source:line`)
//! and travels with the leaf value so later schema diagnostics can name
//! the exact line an operator has to fix.

use std::fmt;
use std::io::Write;

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Severity of an emitted diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Developer-facing detail (tree dumps, trace output).
    Debug,
    /// Informational notices.
    Info,
    /// Recoverable problems: malformed, invalid, missing, or unsupported
    /// options.
    Warn,
    /// Unrecoverable failures.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        formatter.write_str(label)
    }
}

// ============================================================================
// SECTION: Provenance
// ============================================================================

/// Origin of a configuration assignment: source name plus 1-based line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Provenance {
    /// Name of the configuration source (usually a file path).
    pub source: String,
    /// 1-based line number of the assignment within the source.
    pub line: u32,
}

impl Provenance {
    /// Creates a provenance record for `source` at `line`.
    #[must_use]
    pub fn new(source: impl Into<String>, line: u32) -> Self {
        Self {
            source: source.into(),
            line,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.source, self.line)
    }
}

// ============================================================================
// SECTION: Reporter Capability
// ============================================================================

/// Capability for emitting diagnostics.
///
/// Implementations must be safe to call synchronously and repeatedly.
/// Reporting never fails from the caller's point of view; sinks that can
/// fail (for example a writer) swallow their own errors.
pub trait Reporter {
    /// Emits one diagnostic with optional assignment provenance.
    fn report(&mut self, severity: Severity, origin: Option<&Provenance>, message: &str);
}

/// One captured diagnostic, as stored by [`CollectingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the diagnostic.
    pub severity: Severity,
    /// Provenance of the offending assignment, when known.
    pub origin: Option<Provenance>,
    /// Human-readable message.
    pub message: String,
}

/// Reporter that stores diagnostics for later inspection.
///
/// Used by tests and by callers that post-process warnings instead of
/// streaming them.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    /// Captured diagnostics in emission order.
    diagnostics: Vec<Diagnostic>,
}

impl CollectingReporter {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured diagnostics in emission order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, severity: Severity, origin: Option<&Provenance>, message: &str) {
        self.diagnostics.push(Diagnostic {
            severity,
            origin: origin.cloned(),
            message: message.to_string(),
        });
    }
}

/// Reporter that formats diagnostics onto any [`Write`] sink, one line per
/// diagnostic: `SEVERITY source:line: message`.
///
/// Write failures are swallowed; a broken sink must not abort a load.
#[derive(Debug)]
pub struct WriterReporter<W: Write> {
    /// Destination for formatted diagnostic lines.
    sink: W,
}

impl<W: Write> WriterReporter<W> {
    /// Creates a reporter writing to `sink`.
    pub fn new(sink: W) -> Self {
        Self {
            sink,
        }
    }

    /// Consumes the reporter and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> Reporter for WriterReporter<W> {
    fn report(&mut self, severity: Severity, origin: Option<&Provenance>, message: &str) {
        let _ = match origin {
            Some(origin) => writeln!(self.sink, "{severity} {origin}: {message}"),
            None => writeln!(self.sink, "{severity} {message}"),
        };
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
