//! Dialect serializer
//!
//! Emits a snapshot as configuration text in a canonical layout:
//!
//! 1. Header comments
//! 2. Opaque sections, in their original order
//! 3. One `config` block per modeled kind, in [`EntityKind`] order
//!
//! Within an entry, known fields come first in a fixed order per kind,
//! followed by extensions in the order they were read. Output is stable:
//! serializing a re-parsed snapshot reproduces the same text.
//!
//! # List fields
//!
//! Group `member` lists are split into `set` + `append` lines of
//! `member_chunk_size` names each (see [`DialectConfig`]). Every other list
//! field (including VIP `mappedip`) is a single `set` line with
//! space-separated values.
//!
//! # Services
//!
//! Entries are written from their parsed [`ServiceSpec`], so protocol case
//! in the model does not matter. Port entries are grouped by protocol in
//! first-appearance order (see [`canonical_service_order`]).

use crate::config::DialectConfig;
use crate::core::firewall::{
    Address, AddressGroup, AddressSpec, ConfigBlock, ConfigNode, DEFAULT_ROUTE_DESTINATION,
    Entity, EntityKind, PortProtocol, Policy, Route, RouteType, Service, ServiceGroup, ServiceSpec,
    Vip, canonical_service_order,
};
use crate::core::snapshot::Snapshot;
use ipnetwork::Ipv4Network;
use std::fmt::{self, Write};
use strum::IntoEnumIterator;
use tracing::warn;

const INDENT: usize = 4;

/// Serializes with default dialect settings.
pub fn serialize(snapshot: &Snapshot) -> String {
    serialize_with(snapshot, &DialectConfig::default())
}

pub fn serialize_with(snapshot: &Snapshot, config: &DialectConfig) -> String {
    let mut w = Writer::new(config.member_chunk_size);

    for comment in &snapshot.comments {
        w.line(comment);
    }

    for block in &snapshot.opaque_sections {
        w.block(block);
    }

    for kind in EntityKind::iter() {
        let mut entities: Vec<&Entity> = snapshot
            .entities
            .iter()
            .filter(|e| e.kind() == kind)
            .collect();
        if entities.is_empty() {
            continue;
        }

        if kind == EntityKind::Policy {
            // Unplaced policies (`edit` 0) go to the end of the table
            entities.sort_by_key(|e| match e {
                Entity::Policy(p) => (p.edit == 0, p.edit),
                _ => (false, 0),
            });
        }

        w.line(format_args!("config {}", kind.section()));
        w.depth += 1;
        for entity in entities {
            w.entity(entity);
        }
        w.depth -= 1;
        w.line("end");
    }

    w.out
}

// ═══════════════════════════════════════════════════════════════════════════
// Quoting
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `true` if `value` cannot be written as a bare word.
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with('#')
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\\')
}

/// Wraps `value` in double quotes, escaping `\` and `"`.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Bare word when possible, quoted otherwise.
pub fn word(value: &str) -> String {
    if needs_quoting(value) {
        quote(value)
    } else {
        value.to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Writer
// ═══════════════════════════════════════════════════════════════════════════

struct Writer {
    out: String,
    depth: usize,
    chunk: usize,
}

impl Writer {
    fn new(chunk: usize) -> Self {
        Self {
            out: String::new(),
            depth: 0,
            chunk: chunk.max(1),
        }
    }

    fn line(&mut self, text: impl fmt::Display) {
        let indent = self.depth * INDENT;
        let _ = writeln!(self.out, "{:indent$}{text}", "");
    }

    /// `set <field> <values...>`; values are written as given.
    fn set(&mut self, field: &str, values: &[String]) {
        if !values.is_empty() {
            self.line(format_args!("set {field} {}", values.join(" ")));
        }
    }

    fn set_quoted(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(field, &[quote(value)]);
        }
    }

    fn set_word(&mut self, field: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.set(field, &[word(value)]);
        }
    }

    fn set_list(&mut self, field: &str, values: &[String]) {
        let quoted: Vec<String> = values.iter().map(|v| quote(v)).collect();
        self.set(field, &quoted);
    }

    fn set_members(&mut self, values: &[String]) {
        for (i, chunk) in values.chunks(self.chunk).enumerate() {
            let quoted: Vec<String> = chunk.iter().map(|v| quote(v)).collect();
            let op = if i == 0 { "set" } else { "append" };
            self.line(format_args!("{op} member {}", quoted.join(" ")));
        }
    }

    fn enable(&mut self, field: &str, on: bool) {
        if on {
            self.line(format_args!("set {field} enable"));
        }
    }

    fn block(&mut self, block: &ConfigBlock) {
        self.line(format_args!("config {}", block.path));
        self.depth += 1;
        for node in &block.body {
            self.node(node);
        }
        self.depth -= 1;
        self.line("end");
    }

    fn node(&mut self, node: &ConfigNode) {
        match node {
            ConfigNode::Statement(stmt) => {
                let mut text = format!("{} {}", stmt.op, word(&stmt.field));
                for value in &stmt.values {
                    text.push(' ');
                    text.push_str(&word(value));
                }
                self.line(text);
            }
            ConfigNode::Edit { key, body } => {
                self.open_edit(&edit_key(key));
                for node in body {
                    self.node(node);
                }
                self.close_edit();
            }
            ConfigNode::Block(block) => self.block(block),
        }
    }

    fn open_edit(&mut self, key: &str) {
        self.line(format_args!("edit {key}"));
        self.depth += 1;
    }

    fn close_edit(&mut self) {
        self.depth -= 1;
        self.line("next");
    }

    fn extensions(&mut self, extensions: &[ConfigNode]) {
        for node in extensions {
            self.node(node);
        }
    }

    fn entity(&mut self, entity: &Entity) {
        match entity {
            Entity::Policy(p) => self.open_edit(&p.number.to_string()),
            Entity::Route(r) => self.open_edit(&r.number.to_string()),
            named => self.open_edit(&quote(named.name().unwrap_or_default())),
        }

        match entity {
            Entity::Address(a) => self.address(a),
            Entity::AddressGroup(g) => self.address_group(g),
            Entity::Service(s) => self.service(s),
            Entity::ServiceGroup(g) => self.service_group(g),
            Entity::Vip(v) => self.vip(v),
            Entity::Policy(p) => self.policy(p),
            Entity::Route(r) => self.route(r),
        }

        self.extensions(entity.extensions());
        self.close_edit();
    }

    // ───────────────────────────────────────────────────────────────────────
    // Per-kind field order
    // ───────────────────────────────────────────────────────────────────────

    fn address(&mut self, a: &Address) {
        match a.spec() {
            Ok(AddressSpec::Subnet(net)) => {
                self.line(format_args!("set subnet {} {}", net.ip(), net.mask()));
            }
            Ok(AddressSpec::Range { start, end }) => {
                self.line("set type iprange");
                self.line(format_args!("set start-ip {start}"));
                self.line(format_args!("set end-ip {end}"));
            }
            Ok(AddressSpec::Fqdn(name)) => {
                self.line("set type fqdn");
                self.set_quoted("fqdn", Some(name.as_str()));
            }
            Err(_) if a.value.is_empty() => {}
            Err(_) => self.set("subnet", &prefix_tokens(&a.value)),
        }
        self.set_quoted("associated-interface", a.interface.as_deref());
    }

    fn address_group(&mut self, g: &AddressGroup) {
        self.set_word("uuid", g.uuid.as_deref());
        self.set_members(&g.members);
        self.set_quoted("comment", g.comment.as_deref());
    }

    fn service(&mut self, s: &Service) {
        let mut specs = Vec::with_capacity(s.entries.len());
        for entry in &s.entries {
            match entry.parse::<ServiceSpec>() {
                Ok(spec) => specs.push(spec),
                Err(e) => warn!("Service '{}': dropping unrepresentable entry: {e}", s.name),
            }
        }
        let ordered = canonical_service_order(&specs);

        let mut protocols = ordered.iter().filter(|spec| !spec.is_port_based());
        match protocols.next() {
            Some(ServiceSpec::Icmp { v6, icmp_type }) => {
                self.line(if *v6 { "set protocol ICMP6" } else { "set protocol ICMP" });
                if let Some(t) = icmp_type {
                    self.line(format_args!("set icmptype {t}"));
                }
            }
            Some(ServiceSpec::Ip { protocol_number }) => {
                self.line("set protocol IP");
                if let Some(n) = protocol_number {
                    self.line(format_args!("set protocol-number {n}"));
                }
            }
            Some(ServiceSpec::Ports { .. }) | None => {}
        }
        for extra in protocols {
            warn!(
                "Service '{}': only one protocol entry can be written, dropping '{extra}'",
                s.name
            );
        }

        let mut port_groups: Vec<(PortProtocol, Vec<String>)> = Vec::new();
        for spec in &ordered {
            let ServiceSpec::Ports {
                protocol,
                destination,
                source,
            } = spec
            else {
                continue;
            };
            let range = match source {
                Some(src) => format!("{destination}:{src}"),
                None => destination.to_string(),
            };
            match port_groups.last_mut() {
                Some((p, ranges)) if p == protocol => ranges.push(range),
                _ => port_groups.push((*protocol, vec![range])),
            }
        }
        for (protocol, ranges) in &port_groups {
            self.set(protocol.portrange_field(), ranges);
        }

        self.set_quoted("category", s.category.as_deref());
        self.set_quoted("comment", s.comment.as_deref());
    }

    fn service_group(&mut self, g: &ServiceGroup) {
        self.set_members(&g.members);
    }

    fn vip(&mut self, v: &Vip) {
        if !v.external_ip.is_empty() {
            self.set("extip", &[word(&v.external_ip)]);
        }
        self.set_quoted("extintf", v.external_interface.as_deref());
        self.set_list("mappedip", &v.mapped_ip);
    }

    fn policy(&mut self, p: &Policy) {
        self.set_word("uuid", p.uuid.as_deref());
        self.set_list("srcintf", &p.source_interfaces);
        self.set_list("dstintf", &p.destination_interfaces);
        self.set_list("srcaddr", &p.source_addresses);
        self.set_list("dstaddr", &p.destination_addresses);
        self.set("action", &[word(p.action.as_str())]);
        self.set_quoted("schedule", p.schedule.as_deref());
        self.set_list("service", &p.services);
        self.enable("inbound", p.inbound);
        self.enable("outbound", p.outbound);
        self.set_quoted("vpntunnel", p.vpn_tunnel.as_deref());
        self.enable("utm-status", p.utm_status);
        self.enable("profile-status", p.profile_status);
        self.set_quoted("profile", p.profile.as_deref());
        if let Some(mode) = p.log_traffic {
            self.line(format_args!("set logtraffic {mode}"));
        }
        for (field, value) in p.utm_profiles() {
            self.set_quoted(field, value);
        }
        self.set_quoted("traffic-shaper", p.traffic_shaper.as_deref());
        self.set_quoted("traffic-shaper-reverse", p.traffic_shaper_reverse.as_deref());
        self.enable("nat", p.nat_enabled);
        self.enable("natinbound", p.nat_inbound);
        self.set_quoted("comments", p.comments.as_deref());
        if p.disabled {
            self.line("set status disable");
        }
    }

    fn route(&mut self, r: &Route) {
        if r.destination != DEFAULT_ROUTE_DESTINATION {
            match r.destination.parse::<Ipv4Network>() {
                Ok(net) => self.line(format_args!("set dst {} {}", net.ip(), net.mask())),
                Err(_) => self.set("dst", &prefix_tokens(&r.destination)),
            }
        }
        self.set_word("gateway", r.next_hop.as_deref());
        self.set_quoted("device", r.interface.as_deref());
        self.enable("dynamic-gateway", r.route_type == RouteType::Dynamic);
    }
}

/// Tokens for a `subnet`/`dst` value outside the grammar: an `ip mask`
/// style pair stays two words, anything else is one token.
fn prefix_tokens(value: &str) -> Vec<String> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if matches!(tokens.len(), 1 | 2) {
        tokens.into_iter().map(word).collect()
    } else {
        vec![quote(value)]
    }
}

/// Opaque edit keys: bare for table indices, quoted for names.
fn edit_key(key: &str) -> String {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        key.to_string()
    } else {
        quote(key)
    }
}
