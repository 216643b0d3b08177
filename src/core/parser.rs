//! Dialect parser
//!
//! Folds the lexer's statement lines into a [`Snapshot`] in a single forward
//! pass over an explicit block stack:
//!
//! - `config <path>` opens a modeled section (see [`EntityKind::section`]) or
//!   an opaque block that is kept as a [`ConfigBlock`] tree
//! - `edit <key>` inside a modeled section starts an entity draft
//! - `set`/`append`/`unset` feed the innermost draft or opaque block
//! - `next` finishes the draft, `end` closes the block
//!
//! Fields the schema does not model are kept on the entity as extensions in
//! encounter order. Any structural fault aborts the parse with
//! [`Error::MalformedBlock`]; no partial snapshot is ever returned.

use crate::core::error::{Error, Result};
use crate::core::firewall::{
    Action, Address, AddressGroup, ConfigBlock, ConfigNode, DEFAULT_ROUTE_DESTINATION, Entity,
    EntityKind, PortProtocol, Policy, Route, RouteType, Service, ServiceGroup, Statement,
    StatementOp, Vip,
};
use crate::core::lexer::{self, Item, Keyword, Line};
use crate::core::rule_constraints::address_type_is_modeled;
use crate::core::snapshot::Snapshot;
use ipnetwork::Ipv4Network;
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Deepest block nesting accepted before the input is rejected.
pub const MAX_DEPTH: usize = 64;

/// Address value used when an address entry carries no addressing fields.
pub const DEFAULT_ADDRESS_VALUE: &str = "0.0.0.0/0";

/// Parses configuration text into a snapshot.
///
/// # Errors
///
/// Returns [`Error::MalformedBlock`] with the offending line for any
/// structural fault: unknown keywords, unterminated quotes, `next`/`end`
/// without an opener, `set` outside `edit` in a modeled section,
/// non-numeric policy/route keys, bad `enable`/`disable` values, or blocks
/// left open at end of input.
pub fn parse(text: &str) -> Result<Snapshot> {
    let mut parser = Parser::default();

    for item in lexer::tokenize(text)? {
        match item {
            Item::Comment { number, text } => parser.comment(number, text),
            Item::Line(line) => parser.line(line)?,
        }
    }

    parser.finish()
}

#[derive(Default)]
struct Parser {
    stack: Vec<Frame>,
    snapshot: Snapshot,
    seen_statement: bool,
    policy_sequence: u32,
}

enum Frame {
    Section {
        kind: EntityKind,
        line: usize,
    },
    Entry {
        key: String,
        line: usize,
        draft: Draft,
    },
    Opaque {
        path: String,
        line: usize,
        body: Vec<ConfigNode>,
    },
    OpaqueEdit {
        key: String,
        line: usize,
        body: Vec<ConfigNode>,
    },
}

impl Frame {
    fn line(&self) -> usize {
        match self {
            Frame::Section { line, .. }
            | Frame::Entry { line, .. }
            | Frame::Opaque { line, .. }
            | Frame::OpaqueEdit { line, .. } => *line,
        }
    }

    fn describe(&self) -> String {
        match self {
            Frame::Section { kind, .. } => format!("config {}", kind.section()),
            Frame::Opaque { path, .. } => format!("config {path}"),
            Frame::Entry { key, .. } | Frame::OpaqueEdit { key, .. } => format!("edit {key}"),
        }
    }
}

impl Parser {
    fn comment(&mut self, number: usize, text: String) {
        if self.seen_statement {
            debug!("Dropping comment at line {number}");
        } else {
            self.snapshot.comments.push(text);
        }
    }

    fn line(&mut self, line: Line) -> Result<()> {
        self.seen_statement = true;
        let Line {
            number,
            keyword,
            args,
        } = line;

        match keyword {
            Keyword::Config => self.open_config(number, args),
            Keyword::Edit => self.open_edit(number, args),
            Keyword::Set => self.statement(number, StatementOp::Set, args),
            Keyword::Append => self.statement(number, StatementOp::Append, args),
            Keyword::Unset => self.statement(number, StatementOp::Unset, args),
            Keyword::Next => self.close_edit(number),
            Keyword::End => self.close_config(number),
        }
    }

    fn check_depth(&self, number: usize) -> Result<()> {
        if self.stack.len() >= MAX_DEPTH {
            return Err(Error::malformed(
                number,
                format!("blocks nested deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    fn open_config(&mut self, number: usize, args: Vec<String>) -> Result<()> {
        if args.is_empty() {
            return Err(Error::malformed(number, "`config` without a section path"));
        }
        self.check_depth(number)?;
        let path = args.join(" ");

        let frame = match self.stack.last() {
            None => match EntityKind::from_section(&path) {
                Some(kind) => Frame::Section { kind, line: number },
                None => {
                    debug!("Keeping opaque section 'config {path}' from line {number}");
                    Frame::Opaque {
                        path,
                        line: number,
                        body: Vec::new(),
                    }
                }
            },
            Some(Frame::Section { kind, .. }) => {
                return Err(Error::malformed(
                    number,
                    format!(
                        "`config {path}` directly inside `config {}`; expected `edit`",
                        kind.section()
                    ),
                ));
            }
            Some(_) => Frame::Opaque {
                path,
                line: number,
                body: Vec::new(),
            },
        };

        self.stack.push(frame);
        Ok(())
    }

    fn open_edit(&mut self, number: usize, args: Vec<String>) -> Result<()> {
        let key = match <[String; 1]>::try_from(args) {
            Ok([key]) => key,
            Err(args) => {
                return Err(Error::malformed(
                    number,
                    format!("`edit` takes exactly one key, found {}", args.len()),
                ));
            }
        };
        self.check_depth(number)?;

        if let Some(Frame::Section { kind, .. }) = self.stack.last() {
            let kind = *kind;
            let draft = self.draft(kind, &key, number)?;
            self.stack.push(Frame::Entry {
                key,
                line: number,
                draft,
            });
            return Ok(());
        }

        let frame = match self.stack.last() {
            Some(Frame::Section { .. }) | None => {
                return Err(Error::malformed(
                    number,
                    format!("`edit {key}` outside any `config` block"),
                ));
            }
            Some(Frame::Opaque { .. }) => Frame::OpaqueEdit {
                key,
                line: number,
                body: Vec::new(),
            },
            Some(open @ (Frame::Entry { .. } | Frame::OpaqueEdit { .. })) => {
                return Err(Error::malformed(
                    number,
                    format!(
                        "`edit {key}` while `{}` from line {} is still open; missing `next`",
                        open.describe(),
                        open.line()
                    ),
                ));
            }
        };

        self.stack.push(frame);
        Ok(())
    }

    fn draft(&mut self, kind: EntityKind, key: &str, number: usize) -> Result<Draft> {
        let id = || {
            key.parse::<u32>().map_err(|_| {
                Error::malformed(
                    number,
                    format!("{kind} key must be a number, found \"{key}\""),
                )
            })
        };

        Ok(match kind {
            EntityKind::Address => Draft::Address(AddressDraft::new(key)),
            EntityKind::AddressGroup => Draft::AddressGroup(AddressGroup::new(key, Vec::new())),
            EntityKind::Service => Draft::Service(ServiceDraft::new(key)),
            EntityKind::ServiceGroup => Draft::ServiceGroup(ServiceGroup::new(key, Vec::new())),
            EntityKind::Vip => Draft::Vip(Vip {
                name: key.to_string(),
                ..Vip::default()
            }),
            EntityKind::Policy => {
                let mut policy = Policy::new(id()?);
                self.policy_sequence += 1;
                policy.edit = self.policy_sequence;
                Draft::Policy(Box::new(policy))
            }
            EntityKind::Route => Draft::Route(Route::new(id()?)),
        })
    }

    fn statement(&mut self, number: usize, op: StatementOp, args: Vec<String>) -> Result<()> {
        let mut args = args.into_iter();
        let Some(field) = args.next() else {
            return Err(Error::malformed(
                number,
                format!("`{op}` without a field name"),
            ));
        };
        let stmt = Statement {
            op,
            field,
            values: args.collect(),
        };

        match self.stack.last_mut() {
            Some(Frame::Entry { draft, .. }) => draft.apply(stmt, number),
            Some(Frame::Opaque { body, .. } | Frame::OpaqueEdit { body, .. }) => {
                body.push(ConfigNode::Statement(stmt));
                Ok(())
            }
            Some(Frame::Section { kind, .. }) => Err(Error::malformed(
                number,
                format!(
                    "`{op} {}` outside any `edit` in `config {}`",
                    stmt.field,
                    kind.section()
                ),
            )),
            None => Err(Error::malformed(
                number,
                format!("`{op} {}` outside any `config` block", stmt.field),
            )),
        }
    }

    fn close_edit(&mut self, number: usize) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Entry { draft, .. }) => {
                self.snapshot.entities.push(draft.finish());
                Ok(())
            }
            Some(Frame::OpaqueEdit { key, body, .. }) => {
                if let Some(Frame::Opaque { body: parent, .. }) = self.stack.last_mut() {
                    parent.push(ConfigNode::Edit { key, body });
                }
                Ok(())
            }
            Some(open) => Err(Error::malformed(
                number,
                format!(
                    "`next` without matching `edit` (innermost block is `{}` from line {})",
                    open.describe(),
                    open.line()
                ),
            )),
            None => Err(Error::malformed(number, "`next` without matching `edit`")),
        }
    }

    fn close_config(&mut self, number: usize) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Section { .. }) => Ok(()),
            Some(Frame::Opaque { path, body, line }) => {
                let block = ConfigBlock { path, body };
                match self.stack.last_mut() {
                    None => self.snapshot.opaque_sections.push(block),
                    Some(Frame::Entry { draft, .. }) => {
                        draft.extensions_mut().push(ConfigNode::Block(block));
                    }
                    Some(Frame::Opaque { body, .. } | Frame::OpaqueEdit { body, .. }) => {
                        body.push(ConfigNode::Block(block));
                    }
                    Some(Frame::Section { .. }) => {
                        return Err(Error::malformed(
                            line,
                            "nested block directly inside a modeled section",
                        ));
                    }
                }
                Ok(())
            }
            Some(open @ (Frame::Entry { .. } | Frame::OpaqueEdit { .. })) => Err(Error::malformed(
                number,
                format!(
                    "`end` while `{}` from line {} is still open; missing `next`",
                    open.describe(),
                    open.line()
                ),
            )),
            None => Err(Error::malformed(number, "`end` without matching `config`")),
        }
    }

    fn finish(self) -> Result<Snapshot> {
        if let Some(open) = self.stack.last() {
            return Err(Error::malformed(
                open.line(),
                format!("`{}` is never closed", open.describe()),
            ));
        }

        info!(
            "Parsed {} entities and {} opaque sections",
            self.snapshot.entities.len(),
            self.snapshot.opaque_sections.len()
        );
        Ok(self.snapshot)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field Helpers
// ═══════════════════════════════════════════════════════════════════════════

/// Single-valued field: `set` replaces, `unset` clears. A `set` with more
/// than one token is rejected rather than merged.
fn scalar(stmt: &Statement, line: usize) -> Result<Option<String>> {
    match stmt.op {
        StatementOp::Set if stmt.values.len() > 1 => Err(Error::malformed(
            line,
            format!(
                "`{}` takes a single value, found {}",
                stmt.field,
                stmt.values.len()
            ),
        )),
        StatementOp::Set => Ok(Some(stmt.joined())),
        StatementOp::Unset => Ok(None),
        StatementOp::Append => Err(Error::malformed(
            line,
            format!("`append` on single-valued field `{}`", stmt.field),
        )),
    }
}

/// Prefix field (`subnet`, `dst`): one CIDR token or an `ip mask` pair.
fn prefix(stmt: &Statement, line: usize) -> Result<Option<String>> {
    match stmt.op {
        StatementOp::Set if stmt.values.len() > 2 => Err(Error::malformed(
            line,
            format!(
                "`{}` takes an address and mask, found {} values",
                stmt.field,
                stmt.values.len()
            ),
        )),
        StatementOp::Set => Ok(Some(stmt.joined())),
        _ => scalar(stmt, line),
    }
}

/// `enable`/`disable` field. `None` after `unset`.
fn flag(stmt: &Statement, line: usize) -> Result<Option<bool>> {
    match (stmt.op, stmt.values.as_slice()) {
        (StatementOp::Unset, _) => Ok(None),
        (StatementOp::Set, [value]) if value == "enable" => Ok(Some(true)),
        (StatementOp::Set, [value]) if value == "disable" => Ok(Some(false)),
        _ => Err(Error::malformed(
            line,
            format!(
                "`{}` expects enable or disable, found \"{}\"",
                stmt.field,
                stmt.joined()
            ),
        )),
    }
}

/// List field: `set` and `append` accumulate in order, `unset` clears.
fn list(slot: &mut Vec<String>, stmt: &Statement) {
    match stmt.op {
        StatementOp::Set | StatementOp::Append => slot.extend(stmt.values.iter().cloned()),
        StatementOp::Unset => slot.clear(),
    }
}

/// Converts `ip mask` pairs to `ip/len`; anything else is returned as written.
pub(crate) fn prefix_text(value: &str) -> String {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if let [ip, mask] = tokens.as_slice()
        && let (Ok(ip), Ok(mask)) = (ip.parse::<Ipv4Addr>(), mask.parse::<Ipv4Addr>())
        && let Ok(net) = Ipv4Network::with_netmask(ip, mask)
    {
        return net.to_string();
    }
    value.to_string()
}

fn leftover(extensions: &mut Vec<ConfigNode>, field: &str, value: Option<String>) {
    if let Some(value) = value {
        let values = value.split_whitespace().map(str::to_string).collect();
        extensions.push(ConfigNode::Statement(Statement::set(field, values)));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Entity Drafts
// ═══════════════════════════════════════════════════════════════════════════

enum Draft {
    Address(AddressDraft),
    AddressGroup(AddressGroup),
    Service(ServiceDraft),
    ServiceGroup(ServiceGroup),
    Vip(Vip),
    Policy(Box<Policy>),
    Route(Route),
}

impl Draft {
    fn apply(&mut self, stmt: Statement, line: usize) -> Result<()> {
        match self {
            Draft::Address(draft) => draft.apply(stmt, line),
            Draft::AddressGroup(group) => apply_address_group(group, stmt, line),
            Draft::Service(draft) => draft.apply(stmt, line),
            Draft::ServiceGroup(group) => {
                match stmt.field.as_str() {
                    "member" => list(&mut group.members, &stmt),
                    _ => group.extensions.push(ConfigNode::Statement(stmt)),
                }
                Ok(())
            }
            Draft::Vip(vip) => apply_vip(vip, stmt, line),
            Draft::Policy(policy) => apply_policy(policy, stmt, line),
            Draft::Route(route) => apply_route(route, stmt, line),
        }
    }

    fn extensions_mut(&mut self) -> &mut Vec<ConfigNode> {
        match self {
            Draft::Address(draft) => &mut draft.address.extensions,
            Draft::AddressGroup(group) => &mut group.extensions,
            Draft::Service(draft) => &mut draft.service.extensions,
            Draft::ServiceGroup(group) => &mut group.extensions,
            Draft::Vip(vip) => &mut vip.extensions,
            Draft::Policy(policy) => &mut policy.extensions,
            Draft::Route(route) => &mut route.extensions,
        }
    }

    fn finish(self) -> Entity {
        match self {
            Draft::Address(draft) => draft.finish().into(),
            Draft::AddressGroup(group) => group.into(),
            Draft::Service(draft) => draft.finish().into(),
            Draft::ServiceGroup(group) => group.into(),
            Draft::Vip(vip) => vip.into(),
            Draft::Policy(policy) => (*policy).into(),
            Draft::Route(route) => route.into(),
        }
    }
}

struct AddressDraft {
    address: Address,
    address_type: Option<String>,
    subnet: Option<String>,
    start_ip: Option<String>,
    end_ip: Option<String>,
    fqdn: Option<String>,
}

impl AddressDraft {
    fn new(name: &str) -> Self {
        Self {
            address: Address::new(name, ""),
            address_type: None,
            subnet: None,
            start_ip: None,
            end_ip: None,
            fqdn: None,
        }
    }

    fn apply(&mut self, stmt: Statement, line: usize) -> Result<()> {
        match stmt.field.as_str() {
            "subnet" => self.subnet = prefix(&stmt, line)?,
            "start-ip" => self.start_ip = scalar(&stmt, line)?,
            "end-ip" => self.end_ip = scalar(&stmt, line)?,
            "fqdn" => self.fqdn = scalar(&stmt, line)?,
            "associated-interface" => self.address.interface = scalar(&stmt, line)?,
            "type" => {
                let address_type = scalar(&stmt, line)?;
                let modeled = address_type
                    .as_deref()
                    .is_none_or(address_type_is_modeled);
                if !modeled {
                    self.address.extensions.push(ConfigNode::Statement(stmt));
                }
                self.address_type = address_type;
            }
            _ => self.address.extensions.push(ConfigNode::Statement(stmt)),
        }
        Ok(())
    }

    fn finish(self) -> Address {
        let mut address = self.address;

        match self.address_type.as_deref() {
            None | Some("ipmask") => {
                address.value = self
                    .subnet
                    .as_deref()
                    .map_or_else(|| DEFAULT_ADDRESS_VALUE.to_string(), prefix_text);
            }
            Some("iprange") => {
                address.value = match (self.start_ip, self.end_ip) {
                    (Some(start), Some(end)) => format!("{start}-{end}"),
                    (Some(ip), None) | (None, Some(ip)) => ip,
                    (None, None) => String::new(),
                };
            }
            Some("fqdn") => address.value = self.fqdn.unwrap_or_default(),
            Some(_) => {
                // Addressing fields of unmodeled types stay as plain statements
                let ext = &mut address.extensions;
                leftover(ext, "subnet", self.subnet);
                leftover(ext, "start-ip", self.start_ip);
                leftover(ext, "end-ip", self.end_ip);
                leftover(ext, "fqdn", self.fqdn);
            }
        }

        address
    }
}

fn apply_address_group(group: &mut AddressGroup, stmt: Statement, line: usize) -> Result<()> {
    match stmt.field.as_str() {
        "member" => list(&mut group.members, &stmt),
        "comment" => group.comment = scalar(&stmt, line)?,
        "uuid" => group.uuid = scalar(&stmt, line)?,
        _ => group.extensions.push(ConfigNode::Statement(stmt)),
    }
    Ok(())
}

struct ServiceDraft {
    service: Service,
    port_entries: Vec<String>,
    protocol: Option<String>,
    icmp_type: Option<String>,
    protocol_number: Option<String>,
}

impl ServiceDraft {
    fn new(name: &str) -> Self {
        Self {
            service: Service::new(name, Vec::new()),
            port_entries: Vec::new(),
            protocol: None,
            icmp_type: None,
            protocol_number: None,
        }
    }

    fn apply(&mut self, stmt: Statement, line: usize) -> Result<()> {
        if let Some(protocol) = PortProtocol::from_portrange_field(&stmt.field) {
            match stmt.op {
                StatementOp::Set | StatementOp::Append => self
                    .port_entries
                    .extend(stmt.values.iter().map(|range| format!("{protocol}/{range}"))),
                StatementOp::Unset => {
                    let prefix = format!("{protocol}/");
                    self.port_entries.retain(|entry| !entry.starts_with(&prefix));
                }
            }
            return Ok(());
        }

        match stmt.field.as_str() {
            "protocol" => self.protocol = scalar(&stmt, line)?,
            "icmptype" => self.icmp_type = scalar(&stmt, line)?,
            "protocol-number" => self.protocol_number = scalar(&stmt, line)?,
            "comment" => self.service.comment = scalar(&stmt, line)?,
            "category" => self.service.category = scalar(&stmt, line)?,
            _ => self.service.extensions.push(ConfigNode::Statement(stmt)),
        }
        Ok(())
    }

    fn finish(self) -> Service {
        let mut service = self.service;
        let mut entries = self.port_entries;
        let mut icmp_type = self.icmp_type;
        let mut protocol_number = self.protocol_number;

        let with_suffix = |base: &str, suffix: Option<String>| match suffix {
            Some(s) => format!("{base}/{s}"),
            None => base.to_string(),
        };

        match self.protocol.as_deref().map(str::to_ascii_uppercase).as_deref() {
            None | Some("TCP/UDP/SCTP") => {}
            Some("ICMP") => entries.push(with_suffix("icmp", icmp_type.take())),
            Some("ICMP6") => entries.push(with_suffix("icmp6", icmp_type.take())),
            Some("IP") => entries.push(with_suffix("ip", protocol_number.take())),
            Some(_) => leftover(&mut service.extensions, "protocol", self.protocol),
        }

        leftover(&mut service.extensions, "icmptype", icmp_type);
        leftover(&mut service.extensions, "protocol-number", protocol_number);

        service.entries = entries;
        service
    }
}

fn apply_vip(vip: &mut Vip, stmt: Statement, line: usize) -> Result<()> {
    match stmt.field.as_str() {
        "extintf" => vip.external_interface = scalar(&stmt, line)?,
        "extip" => vip.external_ip = scalar(&stmt, line)?.unwrap_or_default(),
        "mappedip" => list(&mut vip.mapped_ip, &stmt),
        _ => vip.extensions.push(ConfigNode::Statement(stmt)),
    }
    Ok(())
}

fn apply_route(route: &mut Route, stmt: Statement, line: usize) -> Result<()> {
    match stmt.field.as_str() {
        "dst" => {
            route.destination = prefix(&stmt, line)?
                .map_or_else(|| DEFAULT_ROUTE_DESTINATION.to_string(), |v| prefix_text(&v));
        }
        "gateway" => route.next_hop = scalar(&stmt, line)?,
        "device" => route.interface = scalar(&stmt, line)?,
        "dynamic-gateway" => {
            route.route_type = if flag(&stmt, line)?.unwrap_or(false) {
                RouteType::Dynamic
            } else {
                RouteType::Static
            };
        }
        _ => route.extensions.push(ConfigNode::Statement(stmt)),
    }
    Ok(())
}

fn apply_policy(policy: &mut Policy, stmt: Statement, line: usize) -> Result<()> {
    let p = policy;
    match stmt.field.as_str() {
        "srcintf" => list(&mut p.source_interfaces, &stmt),
        "dstintf" => list(&mut p.destination_interfaces, &stmt),
        "srcaddr" => list(&mut p.source_addresses, &stmt),
        "dstaddr" => list(&mut p.destination_addresses, &stmt),
        "service" => list(&mut p.services, &stmt),
        "action" => p.action = scalar(&stmt, line)?.map(Action::from).unwrap_or_default(),
        "schedule" => p.schedule = scalar(&stmt, line)?,
        "inbound" => p.inbound = flag(&stmt, line)?.unwrap_or(false),
        "outbound" => p.outbound = flag(&stmt, line)?.unwrap_or(false),
        "vpntunnel" => p.vpn_tunnel = scalar(&stmt, line)?,
        "status" => p.disabled = flag(&stmt, line)? == Some(false),
        "profile-status" => p.profile_status = flag(&stmt, line)?.unwrap_or(false),
        "logtraffic" => {
            p.log_traffic = match scalar(&stmt, line)? {
                Some(mode) => Some(mode.parse().map_err(|_| {
                    Error::malformed(
                        line,
                        format!("`logtraffic` expects enable, disable, all or utm, found \"{mode}\""),
                    )
                })?),
                None => None,
            };
        }
        "nat" => p.nat_enabled = flag(&stmt, line)?.unwrap_or(false),
        "natinbound" => p.nat_inbound = flag(&stmt, line)?.unwrap_or(false),
        "profile" => p.profile = scalar(&stmt, line)?,
        "uuid" => p.uuid = scalar(&stmt, line)?,
        "comments" => p.comments = scalar(&stmt, line)?,
        "traffic-shaper" => p.traffic_shaper = scalar(&stmt, line)?,
        "traffic-shaper-reverse" => p.traffic_shaper_reverse = scalar(&stmt, line)?,
        "utm-status" => p.utm_status = flag(&stmt, line)?.unwrap_or(false),
        "av-profile" => p.av_profile = scalar(&stmt, line)?,
        "webfilter-profile" => p.webfilter_profile = scalar(&stmt, line)?,
        "voip-profile" => p.voip_profile = scalar(&stmt, line)?,
        "ssl-ssh-profile" => p.ssl_ssh_profile = scalar(&stmt, line)?,
        "spamfilter-profile" => p.spamfilter_profile = scalar(&stmt, line)?,
        "profile-protocol-options" => p.profile_protocol_options = scalar(&stmt, line)?,
        "application-list" => p.application_list = scalar(&stmt, line)?,
        "dlp-sensor" => p.dlp_sensor = scalar(&stmt, line)?,
        "ips-sensor" => p.ips_sensor = scalar(&stmt, line)?,
        _ => p.extensions.push(ConfigNode::Statement(stmt)),
    }
    Ok(())
}
