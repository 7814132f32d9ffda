// crates/dotconf-core/src/strings.rs
// ============================================================================
// Module: String Helpers
// Description: Validated low-level text helpers used by the validators.
// Purpose: Hex decoding, URI decomposition, and scaled-integer parsing
//          with documented success/failure contracts.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Small pure helpers with explicit contracts. Each returns success plus
//! the parsed value, or a failure the caller maps onto the validation
//! taxonomy (`Invalid` / `Overflow`). None of them report diagnostics
//! themselves.

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes control characters, quotes, and backslashes for inclusion in a
/// single-line diagnostic message.
pub(crate) fn printable(text: &str) -> String {
    text.chars().flat_map(char::escape_debug).collect()
}

// ============================================================================
// SECTION: Hex
// ============================================================================

/// Decodes exactly `2 * out.len()` hex digits into `out`.
///
/// Returns `false` (leaving `out` unspecified) when the text has the
/// wrong length or contains a non-hex character.
pub fn parse_hex_fixed(text: &str, out: &mut [u8]) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() != out.len() * 2 {
        return false;
    }
    for (index, slot) in out.iter_mut().enumerate() {
        let hi = hex_nibble(bytes[index * 2]);
        let lo = hex_nibble(bytes[index * 2 + 1]);
        match (hi, lo) {
            (Some(hi), Some(lo)) => *slot = (hi << 4) | lo,
            _ => return false,
        }
    }
    true
}

/// Value of one hex digit, or `None` for a non-hex byte.
fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

// ============================================================================
// SECTION: URI Decomposition
// ============================================================================

/// True when `text` matches the URI scheme grammar:
/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`, non-empty.
#[must_use]
pub fn is_uri_scheme(text: &str) -> bool {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(byte) if byte.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes[1..]
        .iter()
        .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.'))
}

/// Splits `scheme://rest` into `(scheme, hierarchical)` where the
/// hierarchical part retains its leading `//`.
///
/// Only text containing `://` with a grammatical scheme is treated as a
/// URI; anything else returns `None` so bare `host[:port]` forms stay
/// distinguishable.
#[must_use]
pub fn split_uri(text: &str) -> Option<(&str, &str)> {
    let colon = text.find("://")?;
    let scheme = &text[..colon];
    if !is_uri_scheme(scheme) {
        return None;
    }
    Some((scheme, &text[colon + 1..]))
}

/// Extracts the authority component from a hierarchical part beginning
/// with `//`: everything up to the first `/`, `?`, or `#`.
///
/// Returns `None` when the hierarchical part has no authority or the
/// authority is empty.
#[must_use]
pub fn uri_authority(hierarchical: &str) -> Option<&str> {
    let rest = hierarchical.strip_prefix("//")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    if authority.is_empty() {
        return None;
    }
    Some(authority)
}

/// Hostname of an authority, with any `userinfo@` prefix and `:port`
/// suffix removed. Returns `None` when the hostname is empty.
#[must_use]
pub fn authority_hostname(authority: &str) -> Option<&str> {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, rest)| rest);
    let host = host_port.split_once(':').map_or(host_port, |(host, _)| host);
    if host.is_empty() {
        return None;
    }
    Some(host)
}

/// Port of an authority, when present and in range `1..=65535`.
///
/// Absent or malformed port text returns `None`; callers keep their
/// default in that case.
#[must_use]
pub fn authority_port(authority: &str) -> Option<u16> {
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, rest)| rest);
    let (_, port_text) = host_port.split_once(':')?;
    if port_text.is_empty() || !port_text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    match port_text.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(port) => Some(port),
    }
}

// ============================================================================
// SECTION: Scaled Integers
// ============================================================================

/// Failure modes of [`parse_u64_scaled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaledError {
    /// Text is not decimal digits with one optional scale suffix.
    Malformed,
    /// The scaled value exceeds `u64`.
    Overflow,
}

/// Parses decimal digits with an optional case-insensitive binary scale
/// suffix: `k` (×1024), `m` (×1024²), `g` (×1024³).
///
/// # Errors
/// [`ScaledError::Malformed`] for anything that is not digits plus at
/// most one trailing suffix; [`ScaledError::Overflow`] when the scaled
/// value does not fit in a `u64`.
pub fn parse_u64_scaled(text: &str) -> Result<u64, ScaledError> {
    let bytes = text.as_bytes();
    let digits_end = bytes.iter().position(|byte| !byte.is_ascii_digit()).unwrap_or(bytes.len());
    if digits_end == 0 {
        return Err(ScaledError::Malformed);
    }
    let scale: u64 = match &bytes[digits_end..] {
        [] => 1,
        [b'k' | b'K'] => 1 << 10,
        [b'm' | b'M'] => 1 << 20,
        [b'g' | b'G'] => 1 << 30,
        _ => return Err(ScaledError::Malformed),
    };
    let mut value: u64 = 0;
    for byte in &bytes[..digits_end] {
        let digit = u64::from(byte - b'0');
        value = value
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit))
            .ok_or(ScaledError::Overflow)?;
    }
    value.checked_mul(scale).ok_or(ScaledError::Overflow)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
