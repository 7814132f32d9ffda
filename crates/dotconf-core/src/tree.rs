// crates/dotconf-core/src/tree.rs
// ============================================================================
// Module: Key Tree
// Description: Ownership tree of dotted-key segments with ordered children.
// Purpose: Hold parsed assignments for schema-driven validation.
// Dependencies: crate::report
// ============================================================================

//! ## Overview
//! A configuration source is materialized as a tree of [`KeyNode`]s, one
//! node per dotted-key segment. Children are kept sorted by final segment
//! and unique, so lookup and insertion are both binary searches. A node
//! may carry a verbatim assigned value (`text`) with its [`Provenance`],
//! children, or both; whether that combination is legal is the schema
//! engine's business, not the tree's.
//!
//! The root node has an empty key and always exists, even for an empty
//! source. Each subtree is exclusively owned by its parent.

use crate::report::Provenance;

// ============================================================================
// SECTION: Key Grammar
// ============================================================================

/// Scans one dotted-key segment starting at `start`.
///
/// A segment must fully match `[A-Za-z_][A-Za-z0-9_]*` and be followed by
/// either a `.` separator or the end of the key. Returns the exclusive
/// end offset of the segment, or `None` when the grammar is violated.
pub(crate) fn find_keyend(key: &str, start: usize) -> Option<usize> {
    let bytes = key.as_bytes();
    let mut end = start;
    match bytes.get(end) {
        Some(byte) if byte.is_ascii_alphabetic() || *byte == b'_' => end += 1,
        _ => return None,
    }
    while matches!(bytes.get(end), Some(byte) if byte.is_ascii_alphanumeric() || *byte == b'_') {
        end += 1;
    }
    match bytes.get(end) {
        None | Some(b'.') => Some(end),
        Some(_) => None,
    }
}

// ============================================================================
// SECTION: KeyNode
// ============================================================================

/// One segment of a dotted configuration key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNode {
    /// Complete dotted path from the root to this node.
    full_key: String,
    /// Offset of the final segment within `full_key`.
    key_off: usize,
    /// Children sorted ascending and unique by final segment.
    children: Vec<KeyNode>,
    /// Verbatim assigned value, present only when this exact dotted key
    /// was assigned in the source.
    text: Option<String>,
    /// Origin of the assignment that set `text`; absent iff `text` is.
    provenance: Option<Provenance>,
}

impl KeyNode {
    /// Creates the empty root node.
    #[must_use]
    pub fn root() -> Self {
        Self {
            full_key: String::new(),
            key_off: 0,
            children: Vec::new(),
            text: None,
            provenance: None,
        }
    }

    /// Complete dotted path from the root; empty for the root itself.
    #[must_use]
    pub fn full_key(&self) -> &str {
        &self.full_key
    }

    /// Final segment of [`Self::full_key`], a view into the owned path.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.full_key[self.key_off..]
    }

    /// Children in ascending key order.
    #[must_use]
    pub fn children(&self) -> &[KeyNode] {
        &self.children
    }

    /// Verbatim assigned value, if this exact key was assigned.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Provenance of the assignment that set `text`.
    #[must_use]
    pub fn provenance(&self) -> Option<&Provenance> {
        self.provenance.as_ref()
    }

    /// Attaches an assigned value with its provenance.
    pub(crate) fn set_text(&mut self, text: String, provenance: Provenance) {
        self.text = Some(text);
        self.provenance = Some(provenance);
    }

    /// Looks up a direct child by exact final segment.
    ///
    /// Equality requires both equal length and equal bytes; a proper
    /// prefix of a child key is not a match.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&KeyNode> {
        self.child_index(key).map(|index| &self.children[index])
    }

    /// Index of the direct child with exact final segment `key`.
    #[must_use]
    pub fn child_index(&self, key: &str) -> Option<usize> {
        self.children.binary_search_by(|child| child.key().cmp(key)).ok()
    }

    /// Finds or inserts the child for the segment `full_key[key_off..]`,
    /// where `full_key` is the dotted path down to and including that
    /// segment. Returns the child's index.
    fn ensure_child(&mut self, full_key: &str, key_off: usize) -> usize {
        let segment = &full_key[key_off..];
        match self.children.binary_search_by(|child| child.key().cmp(segment)) {
            Ok(index) => index,
            Err(index) => {
                self.children.insert(
                    index,
                    Self {
                        full_key: full_key.to_string(),
                        key_off,
                        children: Vec::new(),
                        text: None,
                        provenance: None,
                    },
                );
                index
            }
        }
    }

    /// Descends from this node along `full_key`, creating every missing
    /// intermediate node, and returns the leaf. Idempotent: an existing
    /// path returns the existing node.
    ///
    /// Returns `None` when a segment violates the key grammar. Nodes
    /// created for the segments preceding the violation remain in the
    /// tree, matching the segment-at-a-time insertion of the source
    /// format.
    pub fn insert_path(&mut self, full_key: &str) -> Option<&mut KeyNode> {
        let mut cursor: &mut KeyNode = self;
        let mut start = 0;
        loop {
            let end = find_keyend(full_key, start)?;
            let index = cursor.ensure_child(&full_key[..end], start);
            let parent = cursor;
            cursor = &mut parent.children[index];
            if end == full_key.len() {
                return Some(cursor);
            }
            start = end + 1;
        }
    }

    /// Renders this subtree into `out`, one node per line, for debug
    /// dumps.
    pub fn render_into(&self, out: &mut String, indent: usize) {
        let pad = "   ".repeat(indent);
        let origin = self.provenance.as_ref().map_or_else(|| "-".to_string(), Provenance::to_string);
        out.push_str(&pad);
        out.push_str(&origin);
        out.push_str(" fullkey=`");
        out.push_str(&self.full_key);
        out.push('`');
        if let Some(text) = self.text.as_deref() {
            out.push_str(" text=`");
            out.push_str(text);
            out.push('`');
        }
        out.push('\n');
        for child in &self.children {
            child.render_into(out, indent + 1);
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
