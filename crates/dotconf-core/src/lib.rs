// crates/dotconf-core/src/lib.rs
// ============================================================================
// Module: dotconf-core
// Description: Line-oriented dotted-key configuration parsing with
//              schema-driven validation and typed projection.
// Purpose: Library crate behind the `dotconf` tool; embeddable by any
//          program that wants validated configuration records.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! `dotconf-core` reads `key=value` configuration text where keys are
//! dotted paths (`sync.peers.main.host`), builds an ordered key tree
//! with per-line provenance, and validates that tree against a declared
//! schema, projecting it onto a typed record. Parsing and validation are
//! both total: malformed lines, unknown options, and invalid values are
//! reported through a caller-supplied [`report::Reporter`] and skipped,
//! so the caller always gets a usable record plus the worst
//! [`status::Status`] seen.
//!
//! The pipeline is three stages, each usable on its own:
//!
//! 1. [`parser::parse_config`] / [`parser::parse_file`] — bytes to a
//!    [`tree::KeyNode`] tree.
//! 2. [`schema::validate`] — tree to a typed [`schema::SchemaRecord`]
//!    plus an aggregate status.
//! 3. `serde::Serialize` on the record — typed record to JSON or any
//!    other serde format.
//!
//! [`profile::MainConfig`] is the reference schema used by the CLI.

pub mod parser;
pub mod profile;
pub mod report;
pub mod schema;
pub mod status;
pub mod strings;
pub mod tree;
pub mod validators;

pub use parser::parse_config;
pub use parser::parse_file;
pub use report::Reporter;
pub use schema::validate;
pub use status::Status;
pub use tree::KeyNode;
