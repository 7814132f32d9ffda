// crates/dotconf-core/src/profile.rs
// ============================================================================
// Module: Reference Daemon Schema
// Description: Typed configuration record for a mesh daemon, declared
//              against the schema engine.
// Purpose: Worked example of the field-descriptor DSL; consumed by the
//          CLI and the end-to-end tests.
// Dependencies: crate::schema, crate::status, crate::strings,
//               crate::validators, serde
// ============================================================================

//! ## Overview
//! `MainConfig` is the schema the `dotconf` binary validates against. It
//! exercises every shape the engine supports: nested structs (`log`,
//! `directory`, `sync`), text atoms with every scalar validator, a
//! composite bitmask (`debug`), a composite single-value-or-subtree
//! parser (peer URLs), and capacity-bounded labeled arrays (`sync.peers`,
//! `interfaces`).

use serde::Serialize;
use serde::Serializer;

use crate::report::Reporter;
use crate::schema;
use crate::schema::Field;
use crate::schema::LabeledList;
use crate::schema::SchemaRecord;
use crate::status::Status;
use crate::status::ValueResult;
use crate::strings;
use crate::tree::KeyNode;
use crate::validators;
use crate::validators::InterfaceKind;
use crate::validators::PatternList;
use crate::validators::ServiceId;

// ============================================================================
// SECTION: Limits + Defaults
// ============================================================================

/// Capacity of the log file path buffer.
pub const LOG_FILE_CAP: usize = 256;
/// Capacity of a peer protocol (URI scheme) buffer.
pub const PROTOCOL_CAP: usize = 16;
/// Capacity of a peer hostname buffer.
pub const HOST_CAP: usize = 64;
/// Default peer port when the URL names none.
pub const DEFAULT_PEER_PORT: u16 = 4110;
/// Maximum number of sync peers.
pub const MAX_PEERS: usize = 10;
/// Maximum number of configured interfaces.
pub const MAX_INTERFACES: usize = 10;
/// Default interface port.
pub const DEFAULT_INTERFACE_PORT: u16 = 4110;
/// Default interface speed in bits per second.
pub const DEFAULT_INTERFACE_SPEED: u64 = 1_000_000;

// ============================================================================
// SECTION: Debug Mask
// ============================================================================

/// Bitmask of enabled debug facilities.
///
/// Configured as a subtree of booleans (`debug.rx=true`), where the
/// special flag `all` sets or clears every bit before the individual
/// flags are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugMask(pub u64);

impl DebugMask {
    /// Mask for one named facility; zero for an unknown name.
    #[must_use]
    pub fn flag_mask(name: &str) -> u64 {
        let flags: [(&str, u64); 10] = [
            ("interfaces", 1 << 0),
            ("rx", 1 << 1),
            ("tx", 1 << 2),
            ("verbose", 1 << 3),
            ("io", 1 << 4),
            ("peers", 1 << 5),
            ("routing", 1 << 6),
            ("security", 1 << 7),
            ("queues", 1 << 8),
            ("timing", 1 << 9),
        ];
        if name.eq_ignore_ascii_case("all") {
            return u64::MAX;
        }
        for (flag, mask) in flags {
            if name.eq_ignore_ascii_case(flag) {
                return mask;
            }
        }
        0
    }

    /// Applies the `debug` subtree to this mask.
    ///
    /// `all` is applied first, then clears, then sets, so individual
    /// flags always win over the blanket. Unknown flag names and
    /// unparseable booleans are reported and skipped; the walk itself
    /// never fails.
    pub fn apply_node(&mut self, node: &KeyNode, reporter: &mut dyn Reporter) -> Status {
        let mut set_mask: u64 = 0;
        let mut clear_mask: u64 = 0;
        let mut set_all = false;
        let mut clear_all = false;
        for child in node.children() {
            schema::unsupported_children(reporter, child);
            let mask = Self::flag_mask(child.key());
            if mask == 0 {
                schema::unsupported_node(reporter, child);
                continue;
            }
            let result = match child.text() {
                None => Status::Missing,
                Some(text) => match validators::boolean(text) {
                    Ok(value) => {
                        if mask == u64::MAX {
                            if value {
                                set_all = true;
                            } else {
                                clear_all = true;
                            }
                        } else if value {
                            set_mask |= mask;
                        } else {
                            clear_mask |= mask;
                        }
                        Status::Ok
                    }
                    Err(reject) => Status::from(reject),
                },
            };
            match result {
                Status::Ok => {}
                Status::Error => return Status::Error,
                other => schema::invalid_text(reporter, child, other),
            }
        }
        if set_all {
            self.0 = u64::MAX;
        } else if clear_all {
            self.0 = 0;
        }
        self.0 &= !clear_mask;
        self.0 |= set_mask;
        Status::Ok
    }
}

impl Serialize for DebugMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#x}", self.0))
    }
}

// ============================================================================
// SECTION: Log Section
// ============================================================================

/// `log.*` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogConfig {
    /// Absolute path of the log file; empty means stderr only.
    pub file: String,
    /// Prefix each message with the process id.
    pub show_pid: bool,
    /// Prefix each message with a timestamp.
    pub show_time: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: String::new(),
            show_pid: true,
            show_time: true,
        }
    }
}

impl SchemaRecord for LogConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::atom("file", |record, text| {
                record.file = validators::absolute_path(text, LOG_FILE_CAP)?;
                Ok(())
            }),
            Field::atom("show_pid", |record, text| {
                record.show_pid = validators::boolean(text)?;
                Ok(())
            }),
            Field::atom("show_time", |record, text| {
                record.show_time = validators::boolean(text)?;
                Ok(())
            }),
        ]
    }
}

// ============================================================================
// SECTION: Directory Section
// ============================================================================

/// `directory.*` options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryConfig {
    /// Service identifier of the directory provider.
    pub service: ServiceId,
}

impl SchemaRecord for DirectoryConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![Field::atom("service", |record, text| {
            record.service = validators::service_id(text)?;
            Ok(())
        })]
    }
}

// ============================================================================
// SECTION: Peers
// ============================================================================

/// One sync peer endpoint.
///
/// Accepted either as a single text value — a bare `host[:port]` or a
/// full URI — or as a subtree with explicit `protocol`/`host`/`port`
/// children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeerConfig {
    /// Transfer protocol (URI scheme).
    pub protocol: String,
    /// Peer hostname.
    pub host: String,
    /// Peer port.
    pub port: u16,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: String::new(),
            port: DEFAULT_PEER_PORT,
        }
    }
}

impl SchemaRecord for PeerConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::atom("protocol", |record, text| {
                record.protocol = validators::protocol(text, PROTOCOL_CAP)?;
                Ok(())
            }),
            // The chained constructor leaves `T` open, so the record
            // parameter must be spelled out.
            Field::atom("host", |record: &mut Self, text| {
                record.host = validators::str_nonempty(text, HOST_CAP)?;
                Ok(())
            })
            .mandatory(),
            Field::atom("port", |record, text| {
                record.port = validators::port(text)?;
                Ok(())
            }),
        ]
    }
}

impl PeerConfig {
    /// Parses a peer from its node: the text form when the node carries
    /// a value, otherwise the nested struct form.
    pub fn apply_node(&mut self, node: &KeyNode, reporter: &mut dyn Reporter) -> Status {
        let Some(text) = node.text() else {
            *self = Self::default();
            return schema::walk_struct(self, node, reporter);
        };
        schema::spurious_children(reporter, node);
        let (scheme, authority) = match strings::split_uri(text) {
            Some((scheme, hierarchical)) => match strings::uri_authority(hierarchical) {
                Some(authority) => (scheme, authority),
                None => return Status::Invalid,
            },
            None => ("http", text),
        };
        let Some(host) = strings::authority_hostname(authority) else {
            return Status::Invalid;
        };
        if scheme.len() >= PROTOCOL_CAP {
            return Status::Overflow;
        }
        if host.len() >= HOST_CAP {
            return Status::Overflow;
        }
        self.protocol = scheme.to_string();
        self.host = host.to_string();
        self.port = strings::authority_port(authority).unwrap_or(DEFAULT_PEER_PORT);
        Status::Ok
    }

    /// Array element parser for `sync.peers`.
    ///
    /// # Errors
    /// Any non-`Ok` status of [`Self::apply_node`], which makes the
    /// engine omit this element.
    pub fn parse_element(node: &KeyNode, reporter: &mut dyn Reporter) -> ValueResult<Self> {
        let mut peer = Self::default();
        match peer.apply_node(node, reporter).reject() {
            None => Ok(peer),
            Some(reject) => Err(reject),
        }
    }
}

/// `sync.*` options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncConfig {
    /// Enable background peer sync.
    pub enable: bool,
    /// Configured peers, labeled by their key segment.
    pub peers: LabeledList<PeerConfig>,
}

impl SchemaRecord for SyncConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::atom("enable", |record, text| {
                record.enable = validators::boolean(text)?;
                Ok(())
            }),
            Field::node("peers", |record, node, reporter| {
                schema::walk_array(node, MAX_PEERS, PeerConfig::parse_element, &mut record.peers, reporter)
            }),
        ]
    }
}

// ============================================================================
// SECTION: Interfaces
// ============================================================================

/// One configured network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceConfig {
    /// Interface name patterns this entry applies to.
    #[serde(rename = "match")]
    pub matches: PatternList,
    /// Physical interface kind.
    #[serde(rename = "type")]
    pub kind: InterfaceKind,
    /// Port to bind on this interface.
    pub port: u16,
    /// Nominal link speed in bits per second (scaled suffixes allowed).
    pub speed: u64,
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self {
            matches: PatternList::default(),
            kind: InterfaceKind::Wifi,
            port: DEFAULT_INTERFACE_PORT,
            speed: DEFAULT_INTERFACE_SPEED,
        }
    }
}

impl SchemaRecord for InterfaceConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::atom("match", |record: &mut Self, text| {
                record.matches = validators::pattern_list(text)?;
                Ok(())
            })
            .mandatory(),
            Field::atom("type", |record, text| {
                record.kind = validators::interface_kind(text)?;
                Ok(())
            }),
            Field::atom("port", |record, text| {
                record.port = validators::port(text)?;
                Ok(())
            }),
            Field::atom("speed", |record, text| {
                record.speed = validators::uint64_scaled(text)?;
                Ok(())
            }),
        ]
    }
}

impl InterfaceConfig {
    /// Array element parser for `interfaces`.
    ///
    /// # Errors
    /// Any non-`Ok` aggregate of the nested struct walk, which makes the
    /// engine omit this element.
    pub fn parse_element(node: &KeyNode, reporter: &mut dyn Reporter) -> ValueResult<Self> {
        let mut interface = Self::default();
        match schema::walk_struct(&mut interface, node, reporter).reject() {
            None => Ok(interface),
            Some(reject) => Err(reject),
        }
    }
}

// ============================================================================
// SECTION: Main Record
// ============================================================================

/// The complete daemon configuration record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MainConfig {
    /// `log.*` section.
    pub log: LogConfig,
    /// Debug facility mask from the `debug.*` subtree.
    pub debug: DebugMask,
    /// `directory.*` section.
    pub directory: DirectoryConfig,
    /// `sync.*` section.
    pub sync: SyncConfig,
    /// Configured interfaces, labeled by their key segment.
    pub interfaces: LabeledList<InterfaceConfig>,
}

impl SchemaRecord for MainConfig {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::nested("log", |record, node, reporter| {
                schema::walk_struct(&mut record.log, node, reporter)
            }),
            Field::node("debug", |record, node, reporter| {
                record.debug.apply_node(node, reporter)
            }),
            Field::nested("directory", |record, node, reporter| {
                schema::walk_struct(&mut record.directory, node, reporter)
            }),
            Field::nested("sync", |record, node, reporter| {
                schema::walk_struct(&mut record.sync, node, reporter)
            }),
            Field::node("interfaces", |record, node, reporter| {
                if node.text().is_some() {
                    schema::spurious_children(reporter, node);
                    return Status::Invalid;
                }
                schema::walk_array(
                    node,
                    MAX_INTERFACES,
                    InterfaceConfig::parse_element,
                    &mut record.interfaces,
                    reporter,
                )
            }),
        ]
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;
    use crate::parser::parse_config;
    use crate::report::CollectingReporter;
    use crate::schema::validate;

    /// Parses and validates `input` against [`MainConfig`].
    fn load(input: &str) -> (MainConfig, Status, CollectingReporter) {
        let mut reporter = CollectingReporter::new();
        let root = parse_config("main.conf", input.as_bytes(), &mut reporter);
        let (config, status) = validate::<MainConfig>(&root, &mut reporter);
        (config, status, reporter)
    }

    #[test]
    fn defaults_survive_empty_input() {
        let (config, status, reporter) = load("");
        assert_eq!(status, Status::Ok);
        assert_eq!(config, MainConfig::default());
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn debug_all_then_individual_clear() {
        let (config, status, _) = load("debug.all=yes\ndebug.rx=false\n");
        assert_eq!(status, Status::Ok);
        assert_eq!(config.debug.0, u64::MAX & !DebugMask::flag_mask("rx"));
    }

    #[test]
    fn debug_clear_all_then_individual_set() {
        let (config, _, _) = load("debug.all=off\ndebug.routing=on\n");
        assert_eq!(config.debug.0, DebugMask::flag_mask("routing"));
    }

    #[test]
    fn debug_unknown_flag_is_unsupported_but_harmless() {
        let (config, status, reporter) = load("debug.warpdrive=yes\ndebug.rx=yes\n");
        assert_eq!(status, Status::Ok);
        assert_eq!(config.debug.0, DebugMask::flag_mask("rx"));
        assert_eq!(
            reporter.diagnostics()[0].message,
            "ignoring configuration option `debug.warpdrive` -- not supported"
        );
    }

    #[test]
    fn peer_text_forms() {
        let mut peer = PeerConfig::default();
        let mut reporter = CollectingReporter::new();
        let root = parse_config("p.conf", b"peer=example.net\n", &mut reporter);
        let node = root.child("peer").unwrap();
        assert_eq!(peer.apply_node(node, &mut reporter), Status::Ok);
        assert_eq!(peer.protocol, "http");
        assert_eq!(peer.host, "example.net");
        assert_eq!(peer.port, DEFAULT_PEER_PORT);

        let root = parse_config("p.conf", b"peer=example.net:8080\n", &mut reporter);
        let mut peer = PeerConfig::default();
        assert_eq!(peer.apply_node(root.child("peer").unwrap(), &mut reporter), Status::Ok);
        assert_eq!(peer.port, 8080);

        let root = parse_config("p.conf", b"peer=msp://relay.example.org:7575/x\n", &mut reporter);
        let mut peer = PeerConfig::default();
        assert_eq!(peer.apply_node(root.child("peer").unwrap(), &mut reporter), Status::Ok);
        assert_eq!(peer.protocol, "msp");
        assert_eq!(peer.host, "relay.example.org");
        assert_eq!(peer.port, 7575);
    }

    #[test]
    fn peer_rejects_missing_host_and_oversized_parts() {
        let mut reporter = CollectingReporter::new();
        let root = parse_config("p.conf", b"peer=http://\n", &mut reporter);
        let mut peer = PeerConfig::default();
        assert_eq!(peer.apply_node(root.child("peer").unwrap(), &mut reporter), Status::Invalid);

        let long_host = format!("peer=http://{}\n", "h".repeat(HOST_CAP));
        let root = parse_config("p.conf", long_host.as_bytes(), &mut reporter);
        let mut peer = PeerConfig::default();
        assert_eq!(peer.apply_node(root.child("peer").unwrap(), &mut reporter), Status::Overflow);
    }

    #[test]
    fn peer_nested_form_requires_host() {
        let (config, status, reporter) = load("sync.peers.main.port=8080\n");
        assert_eq!(status, Status::Ok, "omitted element does not poison the aggregate");
        assert!(config.sync.peers.is_empty(), "incomplete peer is omitted");
        let messages: Vec<&str> =
            reporter.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert!(messages.contains(&"missing configuration option `sync.peers.main.host`"));
        assert!(messages.contains(&"ignoring configuration option `sync.peers.main` -- omitted from list"));
    }

    #[test]
    fn interfaces_with_text_value_is_invalid() {
        let (_, status, reporter) = load("interfaces=eth0\n");
        assert_eq!(status, Status::Invalid);
        assert_eq!(
            reporter.diagnostics()[0].message,
            "ignoring configuration option `interfaces` with invalid value 'eth0'"
        );
    }
}
