// crates/dotconf-core/src/parser.rs
// ============================================================================
// Module: Text Parser
// Description: Line-oriented `key=value` parser producing a key tree.
// Purpose: Turn raw configuration bytes into a KeyNode tree with
//          provenance, skipping bad lines with a diagnostic.
// Dependencies: crate::report, crate::strings, crate::tree, thiserror
// ============================================================================

//! ## Overview
//! The input format is one assignment per line: a dotted key, a single
//! `=`, and the verbatim value text to the end of the line. Blank lines
//! are skipped; everything else that fails to parse is reported and
//! ignored so one bad line never discards a whole configuration. The
//! first assignment for a given key wins; later duplicates are warned
//! with a reference to the original line.
//!
//! Keys are ASCII identifiers joined by single dots. Values are taken
//! verbatim (no trimming); bytes that are not valid UTF-8 are decoded
//! lossily per line so a stray byte in one value cannot poison others.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::report::Provenance;
use crate::report::Reporter;
use crate::report::Severity;
use crate::strings::printable;
use crate::tree::KeyNode;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum configuration file size accepted by [`parse_file`], in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Unrecoverable failures while loading a configuration file.
///
/// Per-line problems are not errors: they are reported through the
/// [`Reporter`] and the offending line is skipped.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O failure while reading the file.
    #[error("config io error: {0}")]
    Io(String),
    /// File exceeds [`MAX_CONFIG_FILE_SIZE`].
    #[error("config file too large: {size} bytes (limit {limit})")]
    TooLarge {
        /// Actual file size in bytes.
        size: u64,
        /// Accepted maximum in bytes.
        limit: u64,
    },
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Parses a raw configuration buffer into a key tree.
///
/// `source` names the buffer for diagnostics (usually the file path).
/// Every malformed or duplicate line is reported through `reporter` and
/// skipped. An empty buffer yields a root with no children.
pub fn parse_config(source: &str, buf: &[u8], reporter: &mut dyn Reporter) -> KeyNode {
    let mut root = KeyNode::root();
    let mut rest = buf;
    let mut line_no: u32 = 0;
    while !rest.is_empty() {
        line_no = line_no.saturating_add(1);
        let (mut line, next) = match rest.iter().position(|byte| *byte == b'\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, &rest[rest.len()..]),
        };
        rest = next;
        if let [head @ .., b'\r'] = line {
            line = head;
        }
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let origin = Provenance::new(source, line_no);
        let split = line.iter().position(|byte| *byte == b'=');
        let Some(eq) = split.filter(|eq| *eq > 0) else {
            reporter.report(Severity::Warn, Some(&origin), "malformed configuration line -- ignored");
            continue;
        };
        let key_bytes = &line[..eq];
        let value_bytes = &line[eq + 1..];
        let inserted = std::str::from_utf8(key_bytes)
            .ok()
            .and_then(|key| root.insert_path(key));
        let Some(leaf) = inserted else {
            let key_text = String::from_utf8_lossy(key_bytes);
            reporter.report(
                Severity::Warn,
                Some(&origin),
                &format!("malformed configuration option `{}` -- ignored", printable(&key_text)),
            );
            continue;
        };
        if let Some(previous) = leaf.provenance() {
            let key_text = String::from_utf8_lossy(key_bytes);
            reporter.report(
                Severity::Warn,
                Some(&origin),
                &format!(
                    "duplicate configuration option `{}` -- ignored (original is at {previous})",
                    printable(&key_text)
                ),
            );
            continue;
        }
        leaf.set_text(String::from_utf8_lossy(value_bytes).into_owned(), origin);
    }
    root
}

/// Reads and parses a configuration file, enforcing the size limit.
///
/// # Errors
/// Returns [`LoadError::Io`] when the file cannot be read and
/// [`LoadError::TooLarge`] when it exceeds [`MAX_CONFIG_FILE_SIZE`].
pub fn parse_file(path: &Path, reporter: &mut dyn Reporter) -> Result<KeyNode, LoadError> {
    let metadata =
        fs::metadata(path).map_err(|err| LoadError::Io(format!("{}: {err}", path.display())))?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(LoadError::TooLarge {
            size: metadata.len(),
            limit: MAX_CONFIG_FILE_SIZE,
        });
    }
    let buf = fs::read(path).map_err(|err| LoadError::Io(format!("{}: {err}", path.display())))?;
    Ok(parse_config(&path.display().to_string(), &buf, reporter))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
