// crates/dotconf-core/src/validators.rs
// ============================================================================
// Module: Validator Library
// Description: Pure text-to-typed-value validators for scalar options.
// Purpose: Shared leaf validators consumed by schema field declarations.
// Dependencies: crate::status, crate::strings, serde
// ============================================================================

//! ## Overview
//! Each validator is a pure function from an option's textual form to a
//! [`ValueResult`]: the parsed value or a [`Reject`]. Validators never
//! report diagnostics; the schema engine does that with full provenance.
//!
//! Fixed-capacity validators preserve the bounded-buffer contract of the
//! wire format: a capacity-`N` string accepts at most `N - 1` payload
//! bytes, and anything longer is rejected as `Overflow` rather than
//! silently truncated.

use std::fmt;

use serde::Serialize;
use serde::Serializer;

use crate::status::Reject;
use crate::status::ValueResult;
use crate::strings;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Number of binary bytes in a [`ServiceId`].
pub const SERVICE_ID_LEN: usize = 32;
/// Maximum number of tokens in a [`PatternList`].
pub const MAX_PATTERNS: usize = 16;
/// Capacity of one pattern slot; tokens of `PATTERN_CAP - 1` bytes or
/// fewer are accepted.
pub const PATTERN_CAP: usize = 41;

// ============================================================================
// SECTION: Scalar Validators
// ============================================================================

/// Copies `text` subject to a fixed capacity: at most `cap - 1` bytes.
fn copy_bounded(text: &str, cap: usize) -> ValueResult<String> {
    if text.len() >= cap {
        return Err(Reject::Overflow);
    }
    Ok(text.to_string())
}

/// Case-insensitive boolean: `true|yes|on|1` or `false|no|off|0`.
///
/// # Errors
/// `Invalid` for any other text.
pub fn boolean(text: &str) -> ValueResult<bool> {
    for truthy in ["true", "yes", "on", "1"] {
        if text.eq_ignore_ascii_case(truthy) {
            return Ok(true);
        }
    }
    for falsy in ["false", "no", "off", "0"] {
        if text.eq_ignore_ascii_case(falsy) {
            return Ok(false);
        }
    }
    Err(Reject::Invalid)
}

/// Absolute filesystem path bounded by `cap`.
///
/// # Errors
/// `Invalid` unless the text starts with `/`; `Overflow` at `cap` bytes
/// or more.
pub fn absolute_path(text: &str, cap: usize) -> ValueResult<String> {
    if !text.starts_with('/') {
        return Err(Reject::Invalid);
    }
    copy_bounded(text, cap)
}

/// Non-empty string bounded by `cap`.
///
/// # Errors
/// `Invalid` for empty text; `Overflow` at `cap` bytes or more.
pub fn str_nonempty(text: &str, cap: usize) -> ValueResult<String> {
    if text.is_empty() {
        return Err(Reject::Invalid);
    }
    copy_bounded(text, cap)
}

/// Unsigned integer with an optional binary scale suffix (`k`/`m`/`g`).
///
/// # Errors
/// `Invalid` for malformed numerals; `Overflow` when the scaled value
/// exceeds `u64`.
pub fn uint64_scaled(text: &str) -> ValueResult<u64> {
    strings::parse_u64_scaled(text).map_err(|err| match err {
        strings::ScaledError::Malformed => Reject::Invalid,
        strings::ScaledError::Overflow => Reject::Overflow,
    })
}

/// TCP/UDP port number: all-digit text in `1..=65535`.
///
/// # Errors
/// `Invalid` for non-digit characters, zero, or numeric wraparound
/// during accumulation (overflow is folded into `Invalid`).
pub fn port(text: &str) -> ValueResult<u16> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Err(Reject::Invalid);
    }
    let mut value: u16 = 0;
    for byte in bytes {
        if !byte.is_ascii_digit() {
            return Err(Reject::Invalid);
        }
        let digit = u16::from(byte - b'0');
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit))
            .ok_or(Reject::Invalid)?;
    }
    if value == 0 {
        return Err(Reject::Invalid);
    }
    Ok(value)
}

/// URI scheme name (protocol) bounded by `cap`.
///
/// # Errors
/// `Invalid` when the text violates the scheme grammar; `Overflow` at
/// `cap` bytes or more.
pub fn protocol(text: &str, cap: usize) -> ValueResult<String> {
    if !strings::is_uri_scheme(text) {
        return Err(Reject::Invalid);
    }
    copy_bounded(text, cap)
}

// ============================================================================
// SECTION: Service Identifier
// ============================================================================

/// Fixed-length binary service identifier, written as hex in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceId([u8; SERVICE_ID_LEN]);

impl ServiceId {
    /// The raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SERVICE_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(formatter, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl Serialize for ServiceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Service identifier: exactly `2 * SERVICE_ID_LEN` hex digits.
///
/// # Errors
/// `Invalid` for wrong length or non-hex characters.
pub fn service_id(text: &str) -> ValueResult<ServiceId> {
    let mut bytes = [0u8; SERVICE_ID_LEN];
    if !strings::parse_hex_fixed(text, &mut bytes) {
        return Err(Reject::Invalid);
    }
    Ok(ServiceId(bytes))
}

// ============================================================================
// SECTION: Interface Kind
// ============================================================================

/// Physical kind of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    /// Wired Ethernet.
    Ethernet,
    /// 802.11 wireless.
    Wifi,
    /// Packet radio.
    Radio,
    /// Anything else.
    Other,
}

/// Interface kind keyword, case-insensitive.
///
/// # Errors
/// `Invalid` for an unknown keyword.
pub fn interface_kind(text: &str) -> ValueResult<InterfaceKind> {
    if text.eq_ignore_ascii_case("ethernet") {
        return Ok(InterfaceKind::Ethernet);
    }
    if text.eq_ignore_ascii_case("wifi") {
        return Ok(InterfaceKind::Wifi);
    }
    if text.eq_ignore_ascii_case("radio") {
        return Ok(InterfaceKind::Radio);
    }
    if text.eq_ignore_ascii_case("other") {
        return Ok(InterfaceKind::Other);
    }
    Err(Reject::Invalid)
}

// ============================================================================
// SECTION: Pattern List
// ============================================================================

/// Bounded list of match patterns, split on whitespace and commas.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct PatternList {
    /// Accepted patterns in source order.
    patterns: Vec<String>,
}

impl PatternList {
    /// Accepted patterns in source order.
    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

/// Whitespace/comma-delimited pattern list: up to [`MAX_PATTERNS`]
/// tokens of at most `PATTERN_CAP - 1` bytes each. An empty list is
/// accepted.
///
/// # Errors
/// `Overflow` when there are too many tokens or a token exceeds its
/// slot width.
pub fn pattern_list(text: &str) -> ValueResult<PatternList> {
    let mut patterns = Vec::new();
    let tokens = text
        .split(|ch: char| ch.is_ascii_whitespace() || ch == ',')
        .filter(|token| !token.is_empty());
    for token in tokens {
        if patterns.len() >= MAX_PATTERNS || token.len() >= PATTERN_CAP {
            return Err(Reject::Overflow);
        }
        patterns.push(token.to_string());
    }
    Ok(PatternList {
        patterns,
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
