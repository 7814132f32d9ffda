// crates/dotconf-core/src/schema.rs
// ============================================================================
// Module: Schema Engine
// Description: Declarative field descriptors and the tree-walking
//              validation/projection interpreter.
// Purpose: Declare fields once and get both validation and projection,
//          with worst-status aggregation and full diagnostics.
// Dependencies: crate::report, crate::status, crate::strings, crate::tree,
//               serde
// ============================================================================

//! ## Overview
//! A schema is a value: an ordered list of [`Field`] descriptors, each
//! naming a child key, carrying structural flags, and pointing at a
//! parser that writes into the typed record. One generic interpreter,
//! [`walk_struct`], applies any such schema to a [`KeyNode`]; arrays of
//! homogeneous elements go through [`walk_array`]. There is no code
//! generation and no backtracking: both walks are single-pass, and fields
//! already defaulted or set stand even when a later field fails.
//!
//! Aggregation keeps the worst [`Status`] seen. Recoverable problems are
//! reported through the [`Reporter`] and the walk continues; only
//! [`Status::Error`] aborts, propagating upward immediately. Children
//! present in the tree but absent from the schema are reported as
//! unsupported without affecting the aggregate: unknown settings are
//! tolerated, not fatal.

use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;

use crate::report::Reporter;
use crate::report::Severity;
use crate::status::Reject;
use crate::status::Status;
use crate::status::ValueResult;
use crate::strings::printable;
use crate::tree::KeyNode;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum bytes of an array element label; longer child keys are
/// silently truncated (unlike value overflow, which is rejected).
pub const MAX_LABEL_LEN: usize = 40;

// ============================================================================
// SECTION: Field Descriptors
// ============================================================================

/// Structural constraints on a declared field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFlags {
    /// Absence of the option raises the aggregate to `Missing`.
    pub mandatory: bool,
    /// The node must not carry its own assigned value.
    pub no_text: bool,
    /// The node must not have nested keys.
    pub no_children: bool,
}

/// How a declared field consumes its matching child node.
pub enum FieldKind<T> {
    /// Scalar or string leaf parsed from the child's own text; a child
    /// without text counts as missing.
    Text(fn(&mut T, &str) -> ValueResult<()>),
    /// Sub-parser applied to the child node itself (composite values,
    /// arrays).
    Node(fn(&mut T, &KeyNode, &mut dyn Reporter) -> Status),
    /// Nested struct schema walked recursively.
    Nested(fn(&mut T, &KeyNode, &mut dyn Reporter) -> Status),
}

/// One declared field of a struct schema.
pub struct Field<T> {
    /// Child key this field consumes.
    pub name: &'static str,
    /// Structural constraints.
    pub flags: FieldFlags,
    /// Parser for the matching child.
    pub kind: FieldKind<T>,
}

impl<T> Field<T> {
    /// Declares a scalar/string leaf parsed from text. Leaves must not
    /// have nested keys, so `no_children` is implied.
    #[must_use]
    pub const fn atom(name: &'static str, parse: fn(&mut T, &str) -> ValueResult<()>) -> Self {
        Self {
            name,
            flags: FieldFlags {
                mandatory: false,
                no_text: false,
                no_children: true,
            },
            kind: FieldKind::Text(parse),
        }
    }

    /// Declares a composite field parsed from the child node itself.
    #[must_use]
    pub const fn node(name: &'static str, parse: fn(&mut T, &KeyNode, &mut dyn Reporter) -> Status) -> Self {
        Self {
            name,
            flags: FieldFlags {
                mandatory: false,
                no_text: false,
                no_children: false,
            },
            kind: FieldKind::Node(parse),
        }
    }

    /// Declares a nested struct schema. Struct nodes are purely
    /// structural, so `no_text` is implied.
    #[must_use]
    pub const fn nested(name: &'static str, walk: fn(&mut T, &KeyNode, &mut dyn Reporter) -> Status) -> Self {
        Self {
            name,
            flags: FieldFlags {
                mandatory: false,
                no_text: true,
                no_children: false,
            },
            kind: FieldKind::Nested(walk),
        }
    }

    /// Marks the field mandatory: absence is reported and raises the
    /// aggregate to at least `Missing`.
    #[must_use]
    pub const fn mandatory(mut self) -> Self {
        self.flags.mandatory = true;
        self
    }
}

/// A typed configuration record with a declared schema.
///
/// `Default` supplies the value of every field that the source leaves
/// unset or that fails validation.
pub trait SchemaRecord: Default {
    /// The ordered field declarations for this record.
    fn fields() -> Vec<Field<Self>>
    where
        Self: Sized;
}

// ============================================================================
// SECTION: Labeled Arrays
// ============================================================================

/// One accepted array element with the label taken from its key segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labeled<E> {
    /// Label copied from the element's key, truncated to
    /// [`MAX_LABEL_LEN`].
    pub label: String,
    /// The parsed element.
    pub value: E,
}

/// Ordered, capacity-bounded sequence of labeled elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledList<E> {
    /// Accepted elements in tree order.
    items: Vec<Labeled<E>>,
}

impl<E> LabeledList<E> {
    /// The accepted elements in tree order.
    #[must_use]
    pub fn items(&self) -> &[Labeled<E>] {
        &self.items
    }

    /// Number of accepted elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no element was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<E> Default for LabeledList<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
        }
    }
}

impl<E: Serialize> Serialize for LabeledList<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.items.len()))?;
        for item in &self.items {
            map.serialize_entry(&item.label, &item.value)?;
        }
        map.end()
    }
}

/// Copies a child key into a label, truncating silently at
/// [`MAX_LABEL_LEN`] bytes (floored to a character boundary).
fn truncated_label(key: &str) -> String {
    if key.len() <= MAX_LABEL_LEN {
        return key.to_string();
    }
    let mut end = MAX_LABEL_LEN;
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    key[..end].to_string()
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Reports a node ignored for `reason`, citing its provenance when the
/// node carries an assignment.
fn ignore_node(reporter: &mut dyn Reporter, node: &KeyNode, reason: &str) {
    let mut message = format!("ignoring configuration option `{}`", printable(node.full_key()));
    if !reason.is_empty() {
        message.push_str(" -- ");
        message.push_str(reason);
    }
    reporter.report(Severity::Warn, node.provenance(), &message);
}

/// Reports every value-bearing node under `parent` (exclusive) as
/// ignored for `reason`.
fn ignore_children(reporter: &mut dyn Reporter, parent: &KeyNode, reason: &str) {
    for child in parent.children() {
        ignore_tree(reporter, child, reason);
    }
}

/// Reports `node` and every value-bearing descendant as ignored for
/// `reason`.
fn ignore_tree(reporter: &mut dyn Reporter, node: &KeyNode, reason: &str) {
    if node.text().is_some() {
        ignore_node(reporter, node, reason);
    }
    ignore_children(reporter, node, reason);
}

/// Reports a node that no schema declares.
pub fn unsupported_node(reporter: &mut dyn Reporter, node: &KeyNode) {
    ignore_node(reporter, node, "not supported");
}

/// Reports every child of `parent` as unsupported.
pub fn unsupported_children(reporter: &mut dyn Reporter, parent: &KeyNode) {
    ignore_children(reporter, parent, "not supported");
}

/// Reports an entire unsupported subtree, including `node` itself when
/// it carries a value.
pub fn unsupported_tree(reporter: &mut dyn Reporter, node: &KeyNode) {
    ignore_tree(reporter, node, "not supported");
}

/// Reports children present under a node whose schema takes only text.
pub fn spurious_children(reporter: &mut dyn Reporter, parent: &KeyNode) {
    ignore_children(reporter, parent, "spurious");
}

/// Reports an array element subtree rejected because capacity was
/// already exhausted.
fn list_overflow(reporter: &mut dyn Reporter, node: &KeyNode) {
    ignore_tree(reporter, node, "list overflow");
}

/// Reports an array element skipped because its validator declined it.
fn list_omit_element(reporter: &mut dyn Reporter, node: &KeyNode) {
    ignore_node(reporter, node, "omitted from list");
}

/// Reports a mandatory option that is absent from the tree.
fn missing_node(reporter: &mut dyn Reporter, parent: &KeyNode, name: &str) {
    let path = if parent.full_key().is_empty() {
        name.to_string()
    } else {
        format!("{}.{name}", parent.full_key())
    };
    reporter.report(Severity::Warn, None, &format!("missing configuration option `{path}`"));
}

/// Reports a value rejected by its validator, with phrasing keyed to the
/// rejection status.
pub fn invalid_text(reporter: &mut dyn Reporter, node: &KeyNode, status: Status) {
    let text = node.text().unwrap_or_default();
    let key = printable(node.full_key());
    let value = printable(text);
    let message = match status {
        Status::Invalid => {
            format!("ignoring configuration option `{key}` with invalid value '{value}'")
        }
        Status::Overflow => {
            format!("ignoring configuration option `{key}` with value '{value}' -- overflow")
        }
        Status::Missing => {
            format!("ignoring configuration option `{key}` with value '{value}' -- missing")
        }
        Status::Error => format!(
            "ignoring configuration option `{key}` with value '{value}' -- unrecoverable error"
        ),
        Status::Ok => {
            format!("ignoring configuration option `{key}` with valid value '{value}'")
        }
    };
    reporter.report(Severity::Warn, node.provenance(), &message);
}

// ============================================================================
// SECTION: Struct Walk
// ============================================================================

/// Applies `T`'s declared schema to `node`, projecting accepted values
/// into `record` and returning the aggregate status.
///
/// Single pass over the declared fields, then a sweep reporting every
/// unconsumed child as unsupported. Recoverable field failures are
/// reported and folded into the aggregate; `Error` aborts immediately.
pub fn walk_struct<T: SchemaRecord>(
    record: &mut T,
    node: &KeyNode,
    reporter: &mut dyn Reporter,
) -> Status {
    if node.text().is_some() {
        unsupported_node(reporter, node);
    }
    let mut aggregate = Status::Ok;
    let mut consumed = vec![false; node.children().len()];
    for field in T::fields() {
        let child_index = node.child_index(field.name);
        let result = match child_index {
            None => Status::Missing,
            Some(index) => {
                consumed[index] = true;
                let child = &node.children()[index];
                if field.flags.no_text && child.text().is_some() {
                    unsupported_node(reporter, child);
                }
                if field.flags.no_children && !child.children().is_empty() {
                    unsupported_children(reporter, child);
                }
                match field.kind {
                    FieldKind::Text(parse) => match child.text() {
                        None => Status::Missing,
                        Some(text) => match parse(record, text) {
                            Ok(()) => Status::Ok,
                            Err(reject) => Status::from(reject),
                        },
                    },
                    FieldKind::Node(parse) | FieldKind::Nested(parse) => {
                        parse(record, child, reporter)
                    }
                }
            }
        };
        match result {
            Status::Ok => {}
            Status::Error => return Status::Error,
            Status::Missing => {
                if field.flags.mandatory {
                    missing_node(reporter, node, field.name);
                    aggregate = aggregate.max(Status::Missing);
                }
            }
            worse => {
                if let Some(index) = child_index {
                    let child = &node.children()[index];
                    if child.text().is_some() {
                        invalid_text(reporter, child, worse);
                    }
                }
                aggregate = aggregate.max(worse);
            }
        }
    }
    for (index, child) in node.children().iter().enumerate() {
        if !consumed[index] {
            unsupported_tree(reporter, child);
        }
    }
    aggregate
}

// ============================================================================
// SECTION: Array Walk
// ============================================================================

/// Applies an element parser to every child of `node` in tree order,
/// appending accepted elements to `out` with labels taken from their
/// key segments.
///
/// Once `capacity` is exhausted every remaining child is reported as
/// list overflow and the aggregate becomes at least `Overflow`,
/// regardless of whether that element would have validated. A declined
/// element is reported as omitted and does not consume capacity. `Error`
/// aborts the walk.
pub fn walk_array<E>(
    node: &KeyNode,
    capacity: usize,
    parse: fn(&KeyNode, &mut dyn Reporter) -> ValueResult<E>,
    out: &mut LabeledList<E>,
    reporter: &mut dyn Reporter,
) -> Status {
    if node.text().is_some() {
        unsupported_node(reporter, node);
    }
    let mut aggregate = Status::Ok;
    for child in node.children() {
        if out.items.len() >= capacity {
            aggregate = aggregate.max(Status::Overflow);
            list_overflow(reporter, child);
            continue;
        }
        match parse(child, reporter) {
            Ok(value) => out.items.push(Labeled {
                label: truncated_label(child.key()),
                value,
            }),
            Err(Reject::Error) => return Status::Error,
            Err(_) => list_omit_element(reporter, child),
        }
    }
    aggregate
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Validates a key tree against `T`'s schema and projects it onto a
/// typed record.
///
/// Returns the best-effort record (defaults stand wherever parsing
/// failed) together with the worst aggregate status, so the caller
/// decides whether to proceed.
pub fn validate<T: SchemaRecord>(root: &KeyNode, reporter: &mut dyn Reporter) -> (T, Status) {
    let mut record = T::default();
    let status = walk_struct(&mut record, root, reporter);
    (record, status)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
