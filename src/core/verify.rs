//! Snapshot validation
//!
//! Semantic problems are collected as [`ValidationIssue`]s instead of being
//! raised, so a caller can decide between strict and permissive handling.
//! Checks run in stages and every stage runs regardless of earlier findings:
//!
//! 1. Duplicate keys (one issue per extra occurrence)
//! 2. References from groups and policies
//! 3. Group membership cycles
//! 4. Field values
//! 5. Field combinations
//!
//! Names listed as implicit in [`DialectConfig`] (such as `all`) resolve
//! without a matching entity.

use crate::config::DialectConfig;
use crate::core::firewall::{
    Action, Address, AddressGroup, Entity, EntityKey, EntityKind, Policy, PortProtocol, Route,
    Service, ServiceGroup, ServiceSpec, Vip,
};
use crate::core::index::ReferenceIndex;
use crate::core::rule_constraints::{
    destination_address_kinds, gateway_allowed, inactive_utm_profiles, nat_inbound_allowed,
    profile_allowed, protocol_entry_count, service_kinds, service_mixes_ports_and_protocol,
    source_address_kinds,
};
use crate::core::snapshot::Snapshot;
use crate::validators;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Machine-readable issue category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    DanglingReference,
    DuplicateKey,
    CycleDetected,
    InvalidValue,
    InvalidStateCombination,
}

/// A single semantic problem in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: EntityKind,
    pub key: EntityKey,
    /// Dialect field name (`srcaddr`, `member`, ...), if the issue is about one field
    pub field: Option<String>,
    pub code: IssueCode,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.code, self.kind, self.key)?;
        if let Some(field) = &self.field {
            write!(f, " [{field}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl ValidationIssue {
    fn new(entity: &Entity, field: Option<&str>, code: IssueCode, message: String) -> Self {
        Self {
            kind: entity.kind(),
            key: entity.key(),
            field: field.map(str::to_string),
            code,
            message,
        }
    }
}

/// Validates with default dialect settings.
pub fn validate(snapshot: &Snapshot) -> Vec<ValidationIssue> {
    Validator::new(&DialectConfig::default()).validate(snapshot)
}

pub struct Validator<'c> {
    config: &'c DialectConfig,
}

/// Issue sink bound to one entity.
struct Checks<'e> {
    entity: &'e Entity,
    issues: &'e mut Vec<ValidationIssue>,
}

impl Checks<'_> {
    fn push(&mut self, field: &str, code: IssueCode, message: String) {
        self.issues
            .push(ValidationIssue::new(self.entity, Some(field), code, message));
    }

    fn invalid(&mut self, field: &str, result: Result<impl Sized, String>) {
        if let Err(message) = result {
            self.push(field, IssueCode::InvalidValue, message);
        }
    }

    fn required<T>(&mut self, field: &str, values: &[T]) {
        if values.is_empty() {
            self.push(
                field,
                IssueCode::InvalidValue,
                format!("`{field}` must list at least one entry"),
            );
        }
    }

    fn conflict(&mut self, field: &str, message: String) {
        self.push(field, IssueCode::InvalidStateCombination, message);
    }

    /// Reports every name that is neither implicit nor resolvable as one of `kinds`.
    fn dangling(
        &mut self,
        field: &str,
        names: &[String],
        kinds: &[EntityKind],
        index: &ReferenceIndex<'_>,
        implicit: impl Fn(&str) -> bool,
    ) {
        for name in names {
            if !implicit(name) && index.resolve_any(kinds, name).is_none() {
                let expected: Vec<String> = kinds.iter().map(ToString::to_string).collect();
                self.push(
                    field,
                    IssueCode::DanglingReference,
                    format!("'{name}' does not name any {}", expected.join(" or ")),
                );
            }
        }
    }
}

impl<'c> Validator<'c> {
    pub fn new(config: &'c DialectConfig) -> Self {
        Self { config }
    }

    /// Runs every check stage over `snapshot` and returns all issues found.
    pub fn validate(&self, snapshot: &Snapshot) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        let (index, duplicates) = ReferenceIndex::build_lenient(&snapshot.entities);

        for dup in duplicates {
            issues.push(ValidationIssue::new(
                dup,
                None,
                IssueCode::DuplicateKey,
                format!("another {} already uses key {}", dup.kind(), dup.key()),
            ));
        }

        for entity in &snapshot.entities {
            self.check_references(entity, &index, &mut issues);
        }

        for kind in [EntityKind::AddressGroup, EntityKind::ServiceGroup] {
            for name in index.detect_cycles(kind) {
                issues.push(ValidationIssue {
                    kind,
                    message: format!("{kind} {name} contains itself through its members"),
                    key: EntityKey::Name(name),
                    field: Some("member".to_string()),
                    code: IssueCode::CycleDetected,
                });
            }
        }

        for entity in &snapshot.entities {
            check_values(&mut Checks {
                entity,
                issues: &mut issues,
            });
        }

        for entity in &snapshot.entities {
            check_combinations(&mut Checks {
                entity,
                issues: &mut issues,
            });
        }

        for issue in &issues {
            debug!("{issue}");
        }
        info!(
            "Validated {} entities: {} issues",
            snapshot.entities.len(),
            issues.len()
        );
        issues
    }

    fn check_references(
        &self,
        entity: &Entity,
        index: &ReferenceIndex<'_>,
        issues: &mut Vec<ValidationIssue>,
    ) {
        let mut checks = Checks { entity, issues };
        let addresses = |name: &str| self.config.is_implicit_address(name);
        let services = |name: &str| self.config.is_implicit_service(name);

        match entity {
            Entity::AddressGroup(g) => {
                let kinds = EntityKind::AddressGroup.member_kinds();
                checks.dangling("member", &g.members, kinds, index, addresses);
            }
            Entity::ServiceGroup(g) => {
                let kinds = EntityKind::ServiceGroup.member_kinds();
                checks.dangling("member", &g.members, kinds, index, services);
            }
            Entity::Policy(p) => {
                let destinations = destination_address_kinds(self.config.vip_destinations);
                checks.dangling("srcaddr", &p.source_addresses, source_address_kinds(), index, addresses);
                checks.dangling("dstaddr", &p.destination_addresses, destinations, index, addresses);
                checks.dangling("service", &p.services, service_kinds(), index, services);
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field Values
// ═══════════════════════════════════════════════════════════════════════════

fn check_values(checks: &mut Checks<'_>) {
    let entity = checks.entity;
    if let Some(name) = entity.name() {
        checks.invalid("name", validators::validate_object_name(name));
    }

    match entity {
        Entity::Address(a) => address_values(checks, a),
        Entity::AddressGroup(g) => group_values(checks, g),
        Entity::Service(s) => service_values(checks, s),
        Entity::ServiceGroup(g) => service_group_values(checks, g),
        Entity::Vip(v) => vip_values(checks, v),
        Entity::Policy(p) => policy_values(checks, p),
        Entity::Route(r) => route_values(checks, r),
    }
}

fn address_values(checks: &mut Checks<'_>, a: &Address) {
    if !a.has_unmodeled_type() {
        checks.invalid("subnet", a.spec());
    }
    if let Some(interface) = &a.interface {
        checks.invalid("associated-interface", validators::validate_interface(interface));
    }
}

fn group_values(checks: &mut Checks<'_>, g: &AddressGroup) {
    checks.required("member", &g.members);
    if let Some(uuid) = &g.uuid {
        checks.invalid("uuid", validators::validate_uuid(uuid));
    }
}

fn service_values(checks: &mut Checks<'_>, s: &Service) {
    if s.entries.is_empty() {
        checks.push(
            "protocol",
            IssueCode::InvalidValue,
            "service defines no port range or protocol".to_string(),
        );
    }

    for entry in &s.entries {
        let field = entry
            .split_once('/')
            .and_then(|(proto, _)| proto.to_ascii_lowercase().parse::<PortProtocol>().ok())
            .map_or("protocol", PortProtocol::portrange_field);
        checks.invalid(field, entry.parse::<ServiceSpec>());
    }
}

fn service_group_values(checks: &mut Checks<'_>, g: &ServiceGroup) {
    checks.required("member", &g.members);
}

fn vip_values(checks: &mut Checks<'_>, v: &Vip) {
    if v.external_ip.is_empty() {
        checks.push("extip", IssueCode::InvalidValue, "external IP is missing".to_string());
    } else {
        checks.invalid("extip", validators::validate_host_or_range(&v.external_ip));
    }

    if v.mapped_ip.is_empty() {
        checks.push("mappedip", IssueCode::InvalidValue, "mapped IP is missing".to_string());
    } else {
        for range in &v.mapped_ip {
            checks.invalid("mappedip", validators::validate_host_or_range(range));
        }
    }

    if let Some(interface) = &v.external_interface {
        checks.invalid("extintf", validators::validate_interface(interface));
    }
}

fn policy_values(checks: &mut Checks<'_>, p: &Policy) {
    if let Action::Other(action) = &p.action {
        checks.push(
            "action",
            IssueCode::InvalidValue,
            format!("action must be accept or deny, found '{action}'"),
        );
    }

    checks.required("srcaddr", &p.source_addresses);
    checks.required("dstaddr", &p.destination_addresses);
    checks.required("service", &p.services);

    for (field, interfaces) in [
        ("srcintf", &p.source_interfaces),
        ("dstintf", &p.destination_interfaces),
    ] {
        for interface in interfaces {
            checks.invalid(field, validators::validate_interface(interface));
        }
    }

    if let Some(uuid) = &p.uuid {
        checks.invalid("uuid", validators::validate_uuid(uuid));
    }
}

fn route_values(checks: &mut Checks<'_>, r: &Route) {
    checks.invalid("dst", validators::validate_prefix(&r.destination));
    if let Some(gateway) = &r.next_hop {
        checks.invalid("gateway", validators::validate_host(gateway));
    }
    if let Some(device) = &r.interface {
        checks.invalid("device", validators::validate_interface(device));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Field Combinations
// ═══════════════════════════════════════════════════════════════════════════

fn check_combinations(checks: &mut Checks<'_>) {
    let entity = checks.entity;
    match entity {
        Entity::Policy(p) => {
            if !nat_inbound_allowed(p.nat_enabled, p.nat_inbound) {
                checks.conflict(
                    "natinbound",
                    "natinbound is enabled while nat is disabled".to_string(),
                );
            }
            if !profile_allowed(p) {
                checks.conflict(
                    "profile",
                    "profile is set while profile-status is disabled".to_string(),
                );
            }
            for field in inactive_utm_profiles(p) {
                checks.conflict(field, format!("{field} is set while utm-status is disabled"));
            }
        }
        Entity::Service(s) => {
            // Unparseable entries were already reported as values
            let Ok(specs) = s.specs() else {
                return;
            };
            if service_mixes_ports_and_protocol(&specs) {
                checks.conflict(
                    "protocol",
                    "port ranges and ICMP/IP entries cannot share one service".to_string(),
                );
            }
            if protocol_entry_count(&specs) > 1 {
                checks.conflict(
                    "protocol",
                    "a service can carry only one ICMP/IP entry".to_string(),
                );
            }
        }
        Entity::Route(r) => {
            if !gateway_allowed(r.route_type, r.next_hop.is_some()) {
                checks.conflict(
                    "gateway",
                    "dynamic-gateway routes cannot set an explicit gateway".to_string(),
                );
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::firewall::RouteType;
    use crate::core::test_helpers::*;

    fn codes_for(issues: &[ValidationIssue], code: IssueCode) -> Vec<&ValidationIssue> {
        issues.iter().filter(|i| i.code == code).collect()
    }

    #[test]
    fn test_clean_snapshot_has_no_issues() {
        let snap = snapshot(vec![
            address("LAN", "10.0.0.0/24"),
            address_group("INSIDE", &["LAN"]),
            service("HTTP", &["tcp/80"]),
            service_group("WEB", &["HTTP", "ALL_TCP"]),
            policy(1, &["INSIDE"], &["all"], &["WEB"]),
            route(1, "0.0.0.0/0", Some("203.0.113.1")),
            vip("web-vip", "203.0.113.10", "10.0.0.10"),
        ]);
        assert_eq!(validate(&snap), Vec::new());
    }

    #[test]
    fn test_dangling_policy_reference() {
        let snap = snapshot(vec![
            address("LAN", "10.0.0.0/24"),
            service("HTTP", &["tcp/80"]),
            policy(9, &["NONEXISTENT"], &["all"], &["HTTP"]),
        ]);
        let issues = validate(&snap);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::DanglingReference);
        assert_eq!(issues[0].kind, EntityKind::Policy);
        assert_eq!(issues[0].key, EntityKey::Number(9));
        assert_eq!(issues[0].field.as_deref(), Some("srcaddr"));
        assert!(issues[0].message.contains("NONEXISTENT"));
    }

    #[test]
    fn test_kind_namespaces_are_separate() {
        let snap = snapshot(vec![
            service("LAN", &["tcp/80"]),
            policy(1, &["LAN"], &["all"], &["LAN"]),
        ]);
        let issues = validate(&snap);
        let dangling = codes_for(&issues, IssueCode::DanglingReference);
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].field.as_deref(), Some("srcaddr"));
    }

    #[test]
    fn test_vip_destination_setting() {
        let snap = snapshot(vec![
            vip("web-vip", "203.0.113.10", "10.0.0.10"),
            policy(1, &["all"], &["web-vip"], &["ALL"]),
        ]);
        assert_eq!(codes_for(&validate(&snap), IssueCode::DanglingReference).len(), 1);

        let config = DialectConfig {
            vip_destinations: true,
            ..DialectConfig::default()
        };
        assert!(Validator::new(&config).validate(&snap).is_empty());
    }

    #[test]
    fn test_cycle_reported_for_each_member() {
        let snap = snapshot(vec![
            address_group("A", &["B"]),
            address_group("B", &["A"]),
        ]);
        let issues = validate(&snap);
        let cycles = codes_for(&issues, IssueCode::CycleDetected);
        let keys: Vec<_> = cycles.iter().map(|i| i.key.to_string()).collect();
        assert_eq!(keys, vec!["A", "B"]);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_duplicate_key_reported_once_per_extra() {
        let snap = snapshot(vec![
            address("LAN", "10.0.0.0/24"),
            address("LAN", "10.1.0.0/24"),
            address("LAN", "10.2.0.0/24"),
        ]);
        let issues = validate(&snap);
        assert_eq!(codes_for(&issues, IssueCode::DuplicateKey).len(), 2);
        assert_eq!(issues[0].key, EntityKey::Name("LAN".to_string()));
    }

    #[test]
    fn test_stage_order() {
        let mut p = Policy::new(5);
        p.source_addresses = vec!["missing".to_string()];
        p.destination_addresses = vec!["all".to_string()];
        p.services = vec!["ALL".to_string()];
        p.nat_inbound = true;

        let snap = snapshot(vec![
            address("bad", "10.0.0.0/40"),
            p.into(),
            address("bad", "10.0.0.0/8"),
        ]);
        let codes: Vec<IssueCode> = validate(&snap).into_iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::DuplicateKey,
                IssueCode::DanglingReference,
                IssueCode::InvalidValue,
                IssueCode::InvalidStateCombination,
            ]
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut p = Policy::new(2);
        p.action = Action::Other("ipsec".to_string());
        p.uuid = Some("not-a-uuid".to_string());

        let mut r = Route::new(3);
        r.destination = "10.0.0.1/8".to_string();
        r.next_hop = Some("gateway.example".to_string());

        let snap = snapshot(vec![
            address("", "10.0.0.0/24"),
            service("BROKEN", &["tcp/0", "gre/1"]),
            service_group("EMPTY", &[]),
            vip("half", "", "10.0.0.1-10.0.0.0"),
            p.into(),
            r.into(),
        ]);

        let fields: Vec<(String, String)> = validate(&snap)
            .into_iter()
            .filter(|i| i.code == IssueCode::InvalidValue)
            .map(|i| (i.key.to_string(), i.field.unwrap_or_default()))
            .collect();

        for expected in [
            ("", "name"),
            ("BROKEN", "tcp-portrange"),
            ("BROKEN", "protocol"),
            ("EMPTY", "member"),
            ("half", "extip"),
            ("half", "mappedip"),
            ("2", "action"),
            ("2", "srcaddr"),
            ("2", "dstaddr"),
            ("2", "service"),
            ("2", "uuid"),
            ("3", "dst"),
            ("3", "gateway"),
        ] {
            assert!(
                fields.contains(&(expected.0.to_string(), expected.1.to_string())),
                "missing {expected:?} in {fields:?}"
            );
        }
    }

    #[test]
    fn test_unmodeled_address_type_skips_value_check() {
        let mut geo = Address::new("geo-US", "");
        geo.extensions.push(crate::core::firewall::ConfigNode::Statement(
            crate::core::firewall::Statement::set("type", vec!["geography".to_string()]),
        ));
        let snap = snapshot(vec![geo.into()]);
        assert!(validate(&snap).is_empty());

        let snap = snapshot(vec![address("empty", "")]);
        assert_eq!(validate(&snap).len(), 1);
    }

    #[test]
    fn test_state_combinations() {
        let mut p = Policy::new(1);
        p.source_addresses = vec!["all".to_string()];
        p.destination_addresses = vec!["all".to_string()];
        p.services = vec!["ALL".to_string()];
        p.nat_inbound = true;
        p.profile = Some("scan".to_string());
        p.av_profile = Some("default".to_string());

        let mut r = Route::new(1);
        r.route_type = RouteType::Dynamic;
        r.next_hop = Some("203.0.113.1".to_string());

        let snap = snapshot(vec![
            p.into(),
            r.into(),
            service("MIXED", &["tcp/80", "icmp/8", "ip/47"]),
        ]);
        let issues = validate(&snap);
        let fields: Vec<_> = codes_for(&issues, IssueCode::InvalidStateCombination)
            .into_iter()
            .map(|i| i.field.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            fields,
            vec!["natinbound", "profile", "av-profile", "gateway", "protocol", "protocol"]
        );
    }

    #[test]
    fn test_issue_display_and_json() {
        let snap = snapshot(vec![policy(4, &["ghost"], &["all"], &["ALL"])]);
        let issue = &validate(&snap)[0];
        assert_eq!(
            issue.to_string(),
            "DANGLING_REFERENCE policy 4 [srcaddr]: 'ghost' does not name any address or address-group"
        );

        let json = serde_json::to_value(issue).unwrap();
        assert_eq!(json["code"], "DANGLING_REFERENCE");
        assert_eq!(json["kind"], "policy");
        assert_eq!(json["key"], 4);
    }
}
