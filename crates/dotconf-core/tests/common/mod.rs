// crates/dotconf-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Shared helpers for dotconf-core integration tests.
// Purpose: Reduce duplication across parsing and validation suites.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use dotconf_core::parse_config;
use dotconf_core::profile::MainConfig;
use dotconf_core::report::CollectingReporter;
use dotconf_core::tree::KeyNode;
use dotconf_core::validate;
use dotconf_core::Status;

/// Parses `input` into a key tree, capturing diagnostics.
pub fn parse(input: &str) -> (KeyNode, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    let root = parse_config("test.conf", input.as_bytes(), &mut reporter);
    (root, reporter)
}

/// Parses and validates `input` against the reference daemon schema.
pub fn load_main(input: &str) -> (MainConfig, Status, CollectingReporter) {
    let mut reporter = CollectingReporter::new();
    let root = parse_config("test.conf", input.as_bytes(), &mut reporter);
    let (config, status) = validate::<MainConfig>(&root, &mut reporter);
    (config, status, reporter)
}

/// Collects the diagnostic messages from a reporter in emission order.
pub fn messages(reporter: &CollectingReporter) -> Vec<String> {
    reporter.diagnostics().iter().map(|diag| diag.message.clone()).collect()
}
