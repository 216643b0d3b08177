//! Firewall configuration object model
//!
//! This module defines the typed records for the seven configuration object
//! kinds that the appliance dialect carries, plus the opaque node tree used
//! for everything the schema does not model.
//!
//! # Identity
//!
//! Named kinds ([`Address`], [`AddressGroup`], [`Service`], [`ServiceGroup`],
//! [`Vip`]) are keyed by a case-sensitive name. [`Policy`] and [`Route`] are
//! keyed by their numeric ID. Two entities of the same kind and key are the
//! same object for referential purposes, whatever their other fields hold
//! (see [`Entity::same_object`]). Derived `PartialEq` is field equality.
//!
//! # References
//!
//! Entities never own each other. Group members and policy address/service
//! entries are plain names resolved through
//! [`ReferenceIndex`](crate::core::index::ReferenceIndex).
//!
//! # Example
//!
//! ```
//! use forticonf::core::firewall::{Action, Address, Policy, Service};
//!
//! let lan = Address::new("LAN", "10.0.0.0/24");
//! let http = Service::new("HTTP", vec!["tcp/80".to_string()]);
//!
//! let mut policy = Policy::new(1);
//! policy.source_addresses.push(lan.name.clone());
//! policy.destination_addresses.push("all".to_string());
//! policy.services.push(http.name.clone());
//! policy.action = Action::Accept;
//!
//! assert_eq!(Policy::new(2).action, Action::Deny);
//! ```

use crate::validators;
use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// The seven modeled configuration object kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum EntityKind {
    Address,
    AddressGroup,
    Service,
    ServiceGroup,
    Vip,
    Policy,
    Route,
}

impl EntityKind {
    /// Returns the `config` section path that holds this kind.
    pub const fn section(self) -> &'static str {
        match self {
            EntityKind::Address => "firewall address",
            EntityKind::AddressGroup => "firewall addrgrp",
            EntityKind::Service => "firewall service custom",
            EntityKind::ServiceGroup => "firewall service group",
            EntityKind::Vip => "firewall vip",
            EntityKind::Policy => "firewall policy",
            EntityKind::Route => "router static",
        }
    }

    /// Maps a `config` section path back to its kind.
    pub fn from_section(path: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        Self::iter().find(|kind| kind.section() == path)
    }

    /// Returns `true` for kinds keyed by a numeric ID instead of a name.
    pub const fn keyed_by_number(self) -> bool {
        matches!(self, EntityKind::Policy | EntityKind::Route)
    }

    /// Returns `true` for kinds whose entities list other entities as members.
    pub const fn is_group(self) -> bool {
        matches!(self, EntityKind::AddressGroup | EntityKind::ServiceGroup)
    }

    /// Kinds a member of this group kind may resolve to.
    pub const fn member_kinds(self) -> &'static [EntityKind] {
        match self {
            EntityKind::AddressGroup => &[EntityKind::Address, EntityKind::AddressGroup],
            EntityKind::ServiceGroup => &[EntityKind::Service, EntityKind::ServiceGroup],
            _ => &[],
        }
    }
}

/// Identity of an entity within its kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    Number(u32),
    Name(String),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        Self::Name(s.to_owned())
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        Self::Name(s)
    }
}

impl From<u32> for EntityKey {
    fn from(n: u32) -> Self {
        Self::Number(n)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Opaque Configuration Tree
// ═══════════════════════════════════════════════════════════════════════════

/// Statement keyword for field lines
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StatementOp {
    Set,
    Append,
    Unset,
}

/// A single `set`/`append`/`unset` line with its already un-quoted values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub op: StatementOp,
    pub field: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Statement {
    pub fn set(field: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            op: StatementOp::Set,
            field: field.into(),
            values,
        }
    }

    /// Joins multi-token values with single spaces.
    pub fn joined(&self) -> String {
        self.values.join(" ")
    }
}

/// Node of configuration the schema does not model.
///
/// Kept verbatim in structure so that re-serialization never loses fields
/// introduced by other firmware revisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigNode {
    Statement(Statement),
    Edit { key: String, body: Vec<ConfigNode> },
    Block(ConfigBlock),
}

/// A `config <path>` ... `end` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigBlock {
    pub path: String,
    #[serde(default)]
    pub body: Vec<ConfigNode>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Value Grammars
// ═══════════════════════════════════════════════════════════════════════════

/// Parsed form of an address object's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressSpec {
    /// `a.b.c.d/len`; a bare host parses as `/32`
    Subnet(Ipv4Network),
    /// `start-end`
    Range { start: Ipv4Addr, end: Ipv4Addr },
    Fqdn(String),
}

impl FromStr for AddressSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains(':') {
            return Err(format!("'{s}' is an IPv6 value; use an address6 object"));
        }

        if s.contains('/') {
            return s
                .parse::<Ipv4Network>()
                .map(AddressSpec::Subnet)
                .map_err(|e| format!("Invalid subnet '{s}': {e}"));
        }

        if let Some((start, end)) = s.split_once('-')
            && let (Ok(start), Ok(end)) = (start.parse::<Ipv4Addr>(), end.parse::<Ipv4Addr>())
        {
            if start > end {
                return Err(format!("Range start {start} is after end {end}"));
            }
            return Ok(AddressSpec::Range { start, end });
        }

        if let Ok(host) = s.parse::<Ipv4Addr>() {
            return Ipv4Network::new(host, 32)
                .map(AddressSpec::Subnet)
                .map_err(|e| e.to_string());
        }

        validators::validate_fqdn(s).map(|()| AddressSpec::Fqdn(s.to_string()))
    }
}

impl fmt::Display for AddressSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressSpec::Subnet(net) => write!(f, "{net}"),
            AddressSpec::Range { start, end } => write!(f, "{start}-{end}"),
            AddressSpec::Fqdn(name) => write!(f, "{name}"),
        }
    }
}

/// Port-based service protocols
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum PortProtocol {
    Tcp,
    Udp,
    Sctp,
}

impl PortProtocol {
    /// Returns the dialect field that carries this protocol's port ranges
    pub const fn portrange_field(self) -> &'static str {
        match self {
            PortProtocol::Tcp => "tcp-portrange",
            PortProtocol::Udp => "udp-portrange",
            PortProtocol::Sctp => "sctp-portrange",
        }
    }

    pub fn from_portrange_field(field: &str) -> Option<Self> {
        match field {
            "tcp-portrange" => Some(PortProtocol::Tcp),
            "udp-portrange" => Some(PortProtocol::Udp),
            "sctp-portrange" => Some(PortProtocol::Sctp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |p: &str| {
            p.parse::<u16>()
                .map_err(|_| format!("Invalid port '{p}'"))
        };
        let (start, end) = match s.split_once('-') {
            Some((a, b)) => (parse(a)?, parse(b)?),
            None => {
                let port = parse(s)?;
                (port, port)
            }
        };
        let (start, end) = validators::validate_port_range(start, end)?;
        Ok(Self { start, end })
    }
}

/// One entry of a custom service definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceSpec {
    /// `tcp/80`, `udp/5000-5100`, `tcp/443:1024-65535` (destination:source)
    Ports {
        protocol: PortProtocol,
        destination: PortRange,
        source: Option<PortRange>,
    },
    /// `icmp`, `icmp/8`, `icmp6/128`
    Icmp { v6: bool, icmp_type: Option<u8> },
    /// `ip`, `ip/47`
    Ip { protocol_number: Option<u8> },
}

impl ServiceSpec {
    /// Returns `true` for entries carried by a `*-portrange` field.
    pub const fn is_port_based(&self) -> bool {
        matches!(self, ServiceSpec::Ports { .. })
    }
}

impl FromStr for ServiceSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (proto, rest) = match s.split_once('/') {
            Some((p, r)) => (p, Some(r)),
            None => (s, None),
        };

        let small = |r: &str, what: &str| {
            r.parse::<u8>()
                .map_err(|_| format!("Invalid {what} '{r}' in '{s}'"))
        };

        match proto.to_ascii_lowercase().as_str() {
            "icmp" | "icmp6" => Ok(ServiceSpec::Icmp {
                v6: proto.eq_ignore_ascii_case("icmp6"),
                icmp_type: rest.map(|r| small(r, "ICMP type")).transpose()?,
            }),
            "ip" => Ok(ServiceSpec::Ip {
                protocol_number: rest.map(|r| small(r, "protocol number")).transpose()?,
            }),
            other => {
                let protocol = PortProtocol::from_str(other)
                    .map_err(|_| format!("Unknown protocol '{proto}' in '{s}'"))?;
                let rest = rest.ok_or_else(|| format!("Missing port range in '{s}'"))?;
                let (dst, src) = match rest.split_once(':') {
                    Some((d, s)) => (d, Some(s)),
                    None => (rest, None),
                };
                Ok(ServiceSpec::Ports {
                    protocol,
                    destination: dst.parse()?,
                    source: src.map(str::parse).transpose()?,
                })
            }
        }
    }
}

/// Orders service entries the way the dialect stores them: port entries
/// grouped by protocol in first-appearance order, then protocol entries.
pub fn canonical_service_order(specs: &[ServiceSpec]) -> Vec<&ServiceSpec> {
    let mut protocols: Vec<PortProtocol> = Vec::new();
    for spec in specs {
        if let ServiceSpec::Ports { protocol, .. } = spec
            && !protocols.contains(protocol)
        {
            protocols.push(*protocol);
        }
    }

    let mut ordered = Vec::with_capacity(specs.len());
    for wanted in protocols {
        ordered.extend(specs.iter().filter(|spec| {
            matches!(spec, ServiceSpec::Ports { protocol, .. } if *protocol == wanted)
        }));
    }
    ordered.extend(specs.iter().filter(|spec| !spec.is_port_based()));
    ordered
}

impl fmt::Display for ServiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceSpec::Ports {
                protocol,
                destination,
                source,
            } => {
                write!(f, "{protocol}/{destination}")?;
                if let Some(src) = source {
                    write!(f, ":{src}")?;
                }
                Ok(())
            }
            ServiceSpec::Icmp { v6, icmp_type } => {
                f.write_str(if *v6 { "icmp6" } else { "icmp" })?;
                if let Some(t) = icmp_type {
                    write!(f, "/{t}")?;
                }
                Ok(())
            }
            ServiceSpec::Ip { protocol_number } => {
                f.write_str("ip")?;
                if let Some(n) = protocol_number {
                    write!(f, "/{n}")?;
                }
                Ok(())
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field Enums
// ═══════════════════════════════════════════════════════════════════════════

/// Policy action
///
/// Defaults to `Deny` so a policy whose action line is missing fails closed.
/// Values outside the schema are kept as `Other` and reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Accept,
    #[default]
    Deny,
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Accept => "accept",
            Action::Deny => "deny",
            Action::Other(s) => s,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "accept" => Action::Accept,
            "deny" => Action::Deny,
            other => Action::Other(other.to_string()),
        })
    }
}

impl From<String> for Action {
    fn from(s: String) -> Self {
        match s.as_str() {
            "accept" => Action::Accept,
            "deny" => Action::Deny,
            _ => Action::Other(s),
        }
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Traffic logging mode for a policy
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogTraffic {
    Enable,
    Disable,
    All,
    Utm,
}

/// How a route's gateway is obtained
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RouteType {
    /// Gateway configured explicitly
    #[default]
    Static,
    /// Gateway learned from DHCP/PPPoE on the device interface
    Dynamic,
}

// ═══════════════════════════════════════════════════════════════════════════
// Entities
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    /// Canonical address text: CIDR, `start-end` range, or FQDN
    pub value: String,
    #[serde(default)]
    pub interface: Option<String>,
    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

impl Address {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn spec(&self) -> Result<AddressSpec, String> {
        self.value.parse()
    }

    /// Rewrites `value` in canonical form (a bare host becomes `/32`).
    /// Values outside the grammar are left alone.
    pub fn normalize(&mut self) {
        if let Ok(spec) = self.spec() {
            self.value = spec.to_string();
        }
    }

    /// Returns `true` when the address kept an appliance `type` the schema
    /// does not model (geography, wildcard, dynamic, ...).
    pub fn has_unmodeled_type(&self) -> bool {
        self.extensions.iter().any(|node| {
            matches!(node, ConfigNode::Statement(stmt) if stmt.field == "type")
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressGroup {
    pub name: String,
    /// Ordered member names (Address or AddressGroup)
    pub members: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

impl AddressGroup {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub name: String,
    /// Protocol/port entries such as `tcp/80` or `icmp/8`
    pub entries: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

impl Service {
    pub fn new(name: impl Into<String>, entries: Vec<String>) -> Self {
        Self {
            name: name.into(),
            entries,
            ..Self::default()
        }
    }

    /// Parses every entry, stopping at the first one outside the grammar.
    pub fn specs(&self) -> Result<Vec<ServiceSpec>, String> {
        self.entries.iter().map(|e| e.parse()).collect()
    }

    /// Rewrites the entries in canonical form: lowercase, in
    /// [`canonical_service_order`]. Nothing changes if any entry is outside
    /// the grammar.
    pub fn normalize(&mut self) {
        if let Ok(specs) = self.specs() {
            self.entries = canonical_service_order(&specs)
                .into_iter()
                .map(ToString::to_string)
                .collect();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceGroup {
    pub name: String,
    /// Ordered member names (Service or ServiceGroup)
    pub members: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

impl ServiceGroup {
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        Self {
            name: name.into(),
            members,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub number: u32,
    #[serde(default)]
    pub route_type: RouteType,
    #[serde(default)]
    pub interface: Option<String>,
    /// Destination prefix in CIDR form
    pub destination: String,
    #[serde(default)]
    pub next_hop: Option<String>,
    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

/// Default route destination when a route omits `dst`
pub const DEFAULT_ROUTE_DESTINATION: &str = "0.0.0.0/0";

impl Route {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            route_type: RouteType::Static,
            interface: None,
            destination: DEFAULT_ROUTE_DESTINATION.to_string(),
            next_hop: None,
            extensions: Vec::new(),
        }
    }

    /// Rewrites a CIDR destination with the network's own text.
    pub fn normalize(&mut self) {
        if let Ok(net) = self.destination.parse::<Ipv4Network>() {
            self.destination = net.to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vip {
    pub name: String,
    #[serde(default)]
    pub external_interface: Option<String>,
    pub external_ip: String,
    /// Internal addresses or ranges, one per `mappedip` token
    pub mapped_ip: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

impl Vip {
    /// Creates a VIP mapping `external_ip` to a single internal address or
    /// range. An empty `mapped_ip` leaves the mapping unset.
    pub fn new(
        name: impl Into<String>,
        external_ip: impl Into<String>,
        mapped_ip: impl Into<String>,
    ) -> Self {
        let mapped_ip: String = mapped_ip.into();
        Self {
            name: name.into(),
            external_ip: external_ip.into(),
            mapped_ip: if mapped_ip.is_empty() {
                Vec::new()
            } else {
                vec![mapped_ip]
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// 1-based position in the policy table (evaluation order)
    pub edit: u32,
    /// Policy ID
    pub number: u32,
    #[serde(default)]
    pub source_interfaces: Vec<String>,
    #[serde(default)]
    pub destination_interfaces: Vec<String>,
    #[serde(default)]
    pub source_addresses: Vec<String>,
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    #[serde(default)]
    pub action: Action,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub inbound: bool,
    #[serde(default)]
    pub outbound: bool,
    #[serde(default)]
    pub vpn_tunnel: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub profile_status: bool,
    #[serde(default)]
    pub log_traffic: Option<LogTraffic>,
    #[serde(default)]
    pub nat_enabled: bool,
    #[serde(default)]
    pub nat_inbound: bool,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,

    // Traffic shaping
    #[serde(default)]
    pub traffic_shaper: Option<String>,
    #[serde(default)]
    pub traffic_shaper_reverse: Option<String>,

    // UTM profiles
    #[serde(default)]
    pub utm_status: bool,
    #[serde(default)]
    pub av_profile: Option<String>,
    #[serde(default)]
    pub webfilter_profile: Option<String>,
    #[serde(default)]
    pub voip_profile: Option<String>,
    #[serde(default)]
    pub ssl_ssh_profile: Option<String>,
    #[serde(default)]
    pub spamfilter_profile: Option<String>,
    #[serde(default)]
    pub profile_protocol_options: Option<String>,
    #[serde(default)]
    pub application_list: Option<String>,
    #[serde(default)]
    pub dlp_sensor: Option<String>,
    #[serde(default)]
    pub ips_sensor: Option<String>,

    #[serde(default)]
    pub extensions: Vec<ConfigNode>,
}

impl Policy {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    /// Security profile fields that only take effect with `utm-status enable`,
    /// paired with their dialect names.
    pub fn utm_profiles(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("av-profile", self.av_profile.as_deref()),
            ("webfilter-profile", self.webfilter_profile.as_deref()),
            ("voip-profile", self.voip_profile.as_deref()),
            ("ssl-ssh-profile", self.ssl_ssh_profile.as_deref()),
            ("spamfilter-profile", self.spamfilter_profile.as_deref()),
            (
                "profile-protocol-options",
                self.profile_protocol_options.as_deref(),
            ),
            ("application-list", self.application_list.as_deref()),
            ("dlp-sensor", self.dlp_sensor.as_deref()),
            ("ips-sensor", self.ips_sensor.as_deref()),
        ]
    }
}

/// Any modeled configuration object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Entity {
    Address(Address),
    AddressGroup(AddressGroup),
    Service(Service),
    ServiceGroup(ServiceGroup),
    Vip(Vip),
    Policy(Policy),
    Route(Route),
}

impl Entity {
    pub const fn kind(&self) -> EntityKind {
        match self {
            Entity::Address(_) => EntityKind::Address,
            Entity::AddressGroup(_) => EntityKind::AddressGroup,
            Entity::Service(_) => EntityKind::Service,
            Entity::ServiceGroup(_) => EntityKind::ServiceGroup,
            Entity::Vip(_) => EntityKind::Vip,
            Entity::Policy(_) => EntityKind::Policy,
            Entity::Route(_) => EntityKind::Route,
        }
    }

    /// Name of a named entity; `None` for policies and routes.
    pub fn name(&self) -> Option<&str> {
        match self {
            Entity::Address(a) => Some(&a.name),
            Entity::AddressGroup(g) => Some(&g.name),
            Entity::Service(s) => Some(&s.name),
            Entity::ServiceGroup(g) => Some(&g.name),
            Entity::Vip(v) => Some(&v.name),
            Entity::Policy(_) | Entity::Route(_) => None,
        }
    }

    /// Numeric ID of a policy or route; `None` for named kinds.
    pub const fn number(&self) -> Option<u32> {
        match self {
            Entity::Policy(p) => Some(p.number),
            Entity::Route(r) => Some(r.number),
            _ => None,
        }
    }

    pub fn key(&self) -> EntityKey {
        match self {
            Entity::Policy(p) => EntityKey::Number(p.number),
            Entity::Route(r) => EntityKey::Number(r.number),
            Entity::Address(Address { name, .. })
            | Entity::AddressGroup(AddressGroup { name, .. })
            | Entity::Service(Service { name, .. })
            | Entity::ServiceGroup(ServiceGroup { name, .. })
            | Entity::Vip(Vip { name, .. }) => EntityKey::Name(name.clone()),
        }
    }

    /// Returns `true` if `key` identifies this entity.
    pub fn has_key(&self, key: &EntityKey) -> bool {
        match key {
            EntityKey::Number(n) => self.number() == Some(*n),
            EntityKey::Name(name) => self.name() == Some(name.as_str()),
        }
    }

    /// Identity comparison: same kind and key, other fields ignored.
    pub fn same_object(&self, other: &Entity) -> bool {
        self.kind() == other.kind() && self.key() == other.key()
    }

    /// Member names for group kinds; empty for everything else.
    pub fn members(&self) -> &[String] {
        match self {
            Entity::AddressGroup(g) => &g.members,
            Entity::ServiceGroup(g) => &g.members,
            _ => &[],
        }
    }

    /// Rewrites value fields in the form the serializer writes them, so
    /// that `parse(serialize(..))` returns the entity unchanged.
    pub fn normalize(&mut self) {
        match self {
            Entity::Address(a) => a.normalize(),
            Entity::Service(s) => s.normalize(),
            Entity::Route(r) => r.normalize(),
            Entity::AddressGroup(_)
            | Entity::ServiceGroup(_)
            | Entity::Vip(_)
            | Entity::Policy(_) => {}
        }
    }

    pub fn extensions(&self) -> &[ConfigNode] {
        match self {
            Entity::Address(e) => &e.extensions,
            Entity::AddressGroup(e) => &e.extensions,
            Entity::Service(e) => &e.extensions,
            Entity::ServiceGroup(e) => &e.extensions,
            Entity::Vip(e) => &e.extensions,
            Entity::Policy(e) => &e.extensions,
            Entity::Route(e) => &e.extensions,
        }
    }

    pub fn extensions_mut(&mut self) -> &mut Vec<ConfigNode> {
        match self {
            Entity::Address(e) => &mut e.extensions,
            Entity::AddressGroup(e) => &mut e.extensions,
            Entity::Service(e) => &mut e.extensions,
            Entity::ServiceGroup(e) => &mut e.extensions,
            Entity::Vip(e) => &mut e.extensions,
            Entity::Policy(e) => &mut e.extensions,
            Entity::Route(e) => &mut e.extensions,
        }
    }
}

impl From<Address> for Entity {
    fn from(e: Address) -> Self {
        Entity::Address(e)
    }
}

impl From<AddressGroup> for Entity {
    fn from(e: AddressGroup) -> Self {
        Entity::AddressGroup(e)
    }
}

impl From<Service> for Entity {
    fn from(e: Service) -> Self {
        Entity::Service(e)
    }
}

impl From<ServiceGroup> for Entity {
    fn from(e: ServiceGroup) -> Self {
        Entity::ServiceGroup(e)
    }
}

impl From<Vip> for Entity {
    fn from(e: Vip) -> Self {
        Entity::Vip(e)
    }
}

impl From<Policy> for Entity {
    fn from(e: Policy) -> Self {
        Entity::Policy(e)
    }
}

impl From<Route> for Entity {
    fn from(e: Route) -> Self {
        Entity::Route(e)
    }
}
