// crates/dotconf-core/tests/proptest_parser.rs
// ============================================================================
// Module: Parser Property-Based Tests
// Description: Property tests for the line parser and key tree.
// Purpose: Hold ordering, uniqueness, and verbatim-value invariants
//          across wide input ranges.
// ============================================================================

//! Property-based tests for parser and key-tree invariants.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use dotconf_core::parse_config;
use dotconf_core::report::CollectingReporter;
use dotconf_core::tree::KeyNode;
use proptest::prelude::*;

/// One dotted-key segment per the key grammar.
fn segment_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,6}"
}

/// A dotted key of one to four segments.
fn key_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..=4).prop_map(|segments| segments.join("."))
}

/// A value with no newline or carriage return, so it stays on one line.
fn value_strategy() -> impl Strategy<Value = String> {
    "[^\r\n]{0,24}"
}

/// Asserts the ordering invariant on every node of the tree: children
/// strictly ascending by key segment, therefore unique.
fn assert_sorted_unique(node: &KeyNode) {
    for pair in node.children().windows(2) {
        assert!(
            pair[0].key() < pair[1].key(),
            "children of `{}` out of order: `{}` vs `{}`",
            node.full_key(),
            pair[0].key(),
            pair[1].key()
        );
    }
    for child in node.children() {
        assert_sorted_unique(child);
    }
}

/// Looks up a dotted key, returning the leaf when every segment exists.
fn lookup<'tree>(root: &'tree KeyNode, key: &str) -> Option<&'tree KeyNode> {
    let mut node = root;
    for segment in key.split('.') {
        node = node.child(segment)?;
    }
    Some(node)
}

/// Flattens a tree to `(full_key, text)` pairs in traversal order,
/// ignoring provenance.
fn shape(node: &KeyNode, out: &mut Vec<(String, Option<String>)>) {
    out.push((node.full_key().to_string(), node.text().map(str::to_string)));
    for child in node.children() {
        shape(child, out);
    }
}

proptest! {
    #[test]
    fn children_stay_sorted_and_unique(keys in prop::collection::vec(key_strategy(), 0..24)) {
        let mut input = String::new();
        for (index, key) in keys.iter().enumerate() {
            input.push_str(&format!("{key}={index}\n"));
        }
        let mut reporter = CollectingReporter::new();
        let root = parse_config("prop.conf", input.as_bytes(), &mut reporter);
        assert_sorted_unique(&root);
    }

    #[test]
    fn insertion_order_does_not_change_the_tree(
        keys in prop::collection::vec(key_strategy(), 1..12),
        rotation in 0usize..12,
    ) {
        let forward: String =
            keys.iter().map(|key| format!("{key}=v\n")).collect();
        let mut rotated_keys = keys.clone();
        rotated_keys.rotate_left(rotation % keys.len());
        let rotated: String =
            rotated_keys.iter().map(|key| format!("{key}=v\n")).collect();

        let mut reporter = CollectingReporter::new();
        let forward_root = parse_config("prop.conf", forward.as_bytes(), &mut reporter);
        let rotated_root = parse_config("prop.conf", rotated.as_bytes(), &mut reporter);

        let mut forward_shape = Vec::new();
        shape(&forward_root, &mut forward_shape);
        let mut rotated_shape = Vec::new();
        shape(&rotated_root, &mut rotated_shape);
        prop_assert_eq!(forward_shape, rotated_shape);
    }

    #[test]
    fn first_value_is_kept_verbatim(key in key_strategy(), value in value_strategy()) {
        let input = format!("{key}={value}\n{key}=other\n");
        let mut reporter = CollectingReporter::new();
        let root = parse_config("prop.conf", input.as_bytes(), &mut reporter);
        let leaf = lookup(&root, &key).unwrap();
        prop_assert_eq!(leaf.text(), Some(value.as_str()));
        prop_assert_eq!(reporter.diagnostics().len(), 1);
    }

    #[test]
    fn parser_never_panics_on_arbitrary_bytes(buf in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut reporter = CollectingReporter::new();
        let root = parse_config("prop.conf", &buf, &mut reporter);
        assert_sorted_unique(&root);
    }

    #[test]
    fn accepted_leaves_round_trip_through_reserialization(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 0..16),
    ) {
        let input: String =
            entries.iter().map(|(key, value)| format!("{key}={value}\n")).collect();
        let mut reporter = CollectingReporter::new();
        let first = parse_config("prop.conf", input.as_bytes(), &mut reporter);

        let mut reserialized = String::new();
        emit_leaves(&first, &mut reserialized);
        let second = parse_config("prop.conf", reserialized.as_bytes(), &mut reporter);

        let mut first_shape = Vec::new();
        shape(&first, &mut first_shape);
        let mut second_shape = Vec::new();
        shape(&second, &mut second_shape);
        prop_assert_eq!(first_shape, second_shape);
    }
}

/// Writes every value-bearing node back out as `key=value` lines in
/// traversal order.
fn emit_leaves(node: &KeyNode, out: &mut String) {
    if let Some(text) = node.text() {
        out.push_str(node.full_key());
        out.push('=');
        out.push_str(text);
        out.push('\n');
    }
    for child in node.children() {
        emit_leaves(child, out);
    }
}
