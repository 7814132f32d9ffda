// crates/dotconf-core/src/status.rs
// ============================================================================
// Module: Status Codes
// Description: Per-field outcome codes and the validator result type.
// Purpose: Model recoverable validation outcomes as values, not unwinding.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every validator and every schema walk produces a [`Status`]. The codes
//! form a severity lattice (`Ok < Missing < Invalid < Overflow < Error`);
//! aggregation keeps the worst status seen so a single bad option never
//! discards the rest of a configuration. Only [`Status::Error`] is fatal
//! and unwinds the enclosing walk.
//!
//! Validators return [`ValueResult`], a sum type carrying either the
//! parsed value or a [`Reject`]. This replaces ad hoc status integers so
//! a forgotten check cannot silently accept a bad value.

use std::fmt;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Outcome of validating one option or one subtree.
///
/// The derived `Ord` gives the severity order used for "worst so far"
/// aggregation across the fields of a struct schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    /// Value accepted.
    Ok,
    /// Mandatory option absent; the default was retained.
    Missing,
    /// Value present but fails semantic validation.
    Invalid,
    /// Value plausible but exceeds a fixed capacity.
    Overflow,
    /// Unrecoverable failure; aborts the enclosing walk.
    Error,
}

impl Status {
    /// Converts a non-`Ok` status into the corresponding [`Reject`].
    #[must_use]
    pub const fn reject(self) -> Option<Reject> {
        match self {
            Self::Ok => None,
            Self::Missing => Some(Reject::Missing),
            Self::Invalid => Some(Reject::Invalid),
            Self::Overflow => Some(Reject::Overflow),
            Self::Error => Some(Reject::Error),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::Missing => "missing",
            Self::Invalid => "invalid",
            Self::Overflow => "overflow",
            Self::Error => "unrecoverable error",
        };
        formatter.write_str(label)
    }
}

// ============================================================================
// SECTION: Reject + ValueResult
// ============================================================================

/// The non-`Ok` subset of [`Status`], used as the error arm of
/// [`ValueResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reject {
    /// Option absent or carried no value.
    Missing,
    /// Value fails semantic validation.
    Invalid,
    /// Value exceeds a fixed capacity.
    Overflow,
    /// Unrecoverable failure.
    Error,
}

impl From<Reject> for Status {
    fn from(reject: Reject) -> Self {
        match reject {
            Reject::Missing => Self::Missing,
            Reject::Invalid => Self::Invalid,
            Reject::Overflow => Self::Overflow,
            Reject::Error => Self::Error,
        }
    }
}

/// Result of a single validator: the parsed value or a [`Reject`].
pub type ValueResult<T> = Result<T, Reject>;

// ============================================================================
// SECTION: Tests
// ============================================================================
