// crates/dotconf-core/tests/main_config_validation.rs
// ============================================================================
// Module: Main Config Validation Tests
// Description: End-to-end parse + validate + project coverage against the
//              reference daemon schema.
// Purpose: Ensure realistic configurations produce the expected typed
//          records, statuses, and diagnostics.
// ============================================================================

//! End-to-end validation tests for the reference daemon schema.

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

use dotconf_core::profile::DebugMask;
use dotconf_core::profile::DEFAULT_PEER_PORT;
use dotconf_core::profile::MAX_PEERS;
use dotconf_core::validators::InterfaceKind;
use dotconf_core::validators::SERVICE_ID_LEN;
use dotconf_core::Status;
use serde_json::json;

mod common;

#[test]
fn realistic_config_projects_every_section() {
    let service = "f0".repeat(SERVICE_ID_LEN);
    let input = format!(
        "log.file=/var/log/daemon.log\n\
         log.show_pid=no\n\
         debug.all=false\n\
         debug.routing=yes\n\
         directory.service={service}\n\
         sync.enable=true\n\
         sync.peers.alpha=http://alpha.example.net:8080/\n\
         sync.peers.beta.host=beta.example.net\n\
         interfaces.wlan.match=wlan*\n\
         interfaces.wlan.speed=2m\n"
    );
    let (config, status, reporter) = common::load_main(&input);
    assert_eq!(status, Status::Ok);
    assert!(common::messages(&reporter).is_empty(), "{:?}", common::messages(&reporter));

    assert_eq!(config.log.file, "/var/log/daemon.log");
    assert!(!config.log.show_pid);
    assert!(config.log.show_time, "untouched field keeps its default");
    assert_eq!(config.debug, DebugMask(DebugMask::flag_mask("routing")));
    assert_eq!(config.directory.service.to_string(), "F0".repeat(SERVICE_ID_LEN));
    assert!(config.sync.enable);

    let peers = config.sync.peers.items();
    assert_eq!(peers.len(), 2);
    assert_eq!(peers[0].label, "alpha");
    assert_eq!(peers[0].value.host, "alpha.example.net");
    assert_eq!(peers[0].value.port, 8080);
    assert_eq!(peers[1].label, "beta");
    assert_eq!(peers[1].value.host, "beta.example.net");
    assert_eq!(peers[1].value.port, DEFAULT_PEER_PORT);

    let interfaces = config.interfaces.items();
    assert_eq!(interfaces.len(), 1);
    assert_eq!(interfaces[0].value.matches.patterns(), ["wlan*"]);
    assert_eq!(interfaces[0].value.kind, InterfaceKind::Wifi);
    assert_eq!(interfaces[0].value.speed, 2 * 1024 * 1024);
}

#[test]
fn log_file_and_blanket_debug_mask() {
    let (config, status, _) = common::load_main("log.file=/tmp/x\ndebug.all=yes\n");
    assert_eq!(status, Status::Ok);
    assert_eq!(config.log.file, "/tmp/x");
    assert_eq!(config.debug, DebugMask(u64::MAX));
}

#[test]
fn record_serializes_to_labeled_json() {
    let input = "sync.peers.alpha=host-a\n\
                 interfaces.lan.match=eth0\n\
                 interfaces.lan.type=ethernet\n";
    let (config, status, _) = common::load_main(input);
    assert_eq!(status, Status::Ok);
    let value = serde_json::to_value(&config).unwrap();
    assert_eq!(
        value["sync"]["peers"],
        json!({"alpha": {"protocol": "http", "host": "host-a", "port": 4110}})
    );
    assert_eq!(value["interfaces"]["lan"]["type"], json!("ethernet"));
    assert_eq!(value["interfaces"]["lan"]["match"], json!(["eth0"]));
    assert_eq!(value["debug"], json!("0x0"));
}

#[test]
fn peer_list_overflow_rejects_the_remainder() {
    let mut input = String::new();
    for index in 0..=MAX_PEERS {
        input.push_str(&format!("sync.peers.p{index:02}=host{index}\n"));
    }
    let (config, status, reporter) = common::load_main(&input);
    assert_eq!(status, Status::Overflow);
    assert_eq!(config.sync.peers.len(), MAX_PEERS);
    let expected = format!(
        "ignoring configuration option `sync.peers.p{MAX_PEERS}` -- list overflow"
    );
    assert!(
        common::messages(&reporter).contains(&expected),
        "{:?}",
        common::messages(&reporter)
    );
}

#[test]
fn overflowing_element_is_rejected_even_when_it_would_validate() {
    // The element past capacity is a perfectly good peer; it is still
    // refused and the aggregate still reports overflow.
    let mut input = String::new();
    for index in 0..MAX_PEERS {
        input.push_str(&format!("sync.peers.p{index:02}=host{index}\n"));
    }
    input.push_str("sync.peers.zz=valid.example.net:4110\n");
    let (config, status, _) = common::load_main(&input);
    assert_eq!(status, Status::Overflow);
    assert!(config.sync.peers.items().iter().all(|item| item.label != "zz"));
}

#[test]
fn declined_element_is_omitted_without_consuming_capacity() {
    let input = "sync.peers.bad=http://\n\
                 sync.peers.good=fine.example.net\n";
    let (config, status, reporter) = common::load_main(input);
    assert_eq!(status, Status::Ok);
    assert_eq!(config.sync.peers.len(), 1);
    assert_eq!(config.sync.peers.items()[0].label, "good");
    assert!(common::messages(&reporter)
        .contains(&"ignoring configuration option `sync.peers.bad` -- omitted from list".to_string()));
}

#[test]
fn interface_without_match_is_omitted_as_missing() {
    let input = "interfaces.lan.type=ethernet\n";
    let (config, status, reporter) = common::load_main(input);
    assert_eq!(status, Status::Ok);
    assert!(config.interfaces.is_empty());
    let messages = common::messages(&reporter);
    assert!(messages.contains(&"missing configuration option `interfaces.lan.match`".to_string()));
    assert!(
        messages.contains(&"ignoring configuration option `interfaces.lan` -- omitted from list".to_string())
    );
}

#[test]
fn invalid_value_cites_the_offending_line() {
    let input = "log.show_pid=sometimes\n";
    let (config, status, reporter) = common::load_main(input);
    assert_eq!(status, Status::Invalid);
    assert!(config.log.show_pid, "default stands after rejection");
    let diag = &reporter.diagnostics()[0];
    assert_eq!(
        diag.message,
        "ignoring configuration option `log.show_pid` with invalid value 'sometimes'"
    );
    let origin = diag.origin.as_ref().unwrap();
    assert_eq!(origin.source, "test.conf");
    assert_eq!(origin.line, 1);
}

#[test]
fn oversized_value_reports_overflow_not_truncation() {
    let long = "x".repeat(300);
    let input = format!("log.file=/{long}\n");
    let (config, status, reporter) = common::load_main(&input);
    assert_eq!(status, Status::Overflow);
    assert_eq!(config.log.file, "", "value is rejected, never truncated");
    assert!(common::messages(&reporter)[0].ends_with("-- overflow"));
}

#[test]
fn unknown_options_warn_but_do_not_fail() {
    let input = "log.file=/tmp/d.log\nrhizome.enable=yes\n";
    let (_, status, reporter) = common::load_main(input);
    assert_eq!(status, Status::Ok);
    assert_eq!(
        common::messages(&reporter),
        ["ignoring configuration option `rhizome.enable` -- not supported"]
    );
}

#[test]
fn duplicate_line_keeps_first_assignment_through_validation() {
    let input = "log.file=/first.log\nlog.file=/second.log\n";
    let (config, status, reporter) = common::load_main(input);
    assert_eq!(status, Status::Ok);
    assert_eq!(config.log.file, "/first.log");
    assert_eq!(
        common::messages(&reporter),
        ["duplicate configuration option `log.file` -- ignored (original is at test.conf:1)"]
    );
}

#[test]
fn one_bad_line_never_discards_the_rest() {
    let input = "garbage line\nlog.file=/kept.log\n1bad=1\ndebug.rx=yes\n";
    let (config, status, reporter) = common::load_main(input);
    assert_eq!(status, Status::Ok);
    assert_eq!(config.log.file, "/kept.log");
    assert_eq!(config.debug, DebugMask(DebugMask::flag_mask("rx")));
    assert_eq!(reporter.diagnostics().len(), 2);
}
