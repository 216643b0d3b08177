//! Field combination constraints for configuration objects
//!
//! The appliance accepts many field combinations that only make sense
//! together. This module holds those rules as plain predicates so the
//! validator and the parser agree on them.
//!
//! # Examples
//!
//! ```
//! use forticonf::core::firewall::{Policy, RouteType};
//! use forticonf::core::rule_constraints::*;
//!
//! assert!(nat_inbound_allowed(true, true));
//! assert!(!nat_inbound_allowed(false, true));
//!
//! assert!(gateway_allowed(RouteType::Static, true));
//! assert!(!gateway_allowed(RouteType::Dynamic, true));
//!
//! let mut policy = Policy::new(1);
//! policy.av_profile = Some("default".to_string());
//! assert_eq!(inactive_utm_profiles(&policy).collect::<Vec<_>>(), vec!["av-profile"]);
//! ```

use super::firewall::{EntityKind, Policy, RouteType, ServiceSpec};

// ═══════════════════════════════════════════════════════════════════════════
// Address Constraints
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `true` if an address `type` folds into the address value grammar.
///
/// # Examples
///
/// ```
/// use forticonf::core::rule_constraints::address_type_is_modeled;
///
/// assert!(address_type_is_modeled("ipmask"));
/// assert!(address_type_is_modeled("fqdn"));
/// assert!(!address_type_is_modeled("geography"));
/// ```
#[inline]
pub fn address_type_is_modeled(address_type: &str) -> bool {
    matches!(address_type, "ipmask" | "iprange" | "fqdn")
}

// ═══════════════════════════════════════════════════════════════════════════
// Service Constraints
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `true` if a service mixes port ranges with a protocol-based entry.
///
/// The appliance keeps a single `protocol` per custom service, so
/// `tcp/80` and `icmp/8` cannot live in the same object.
#[inline]
pub fn service_mixes_ports_and_protocol(specs: &[ServiceSpec]) -> bool {
    let ports = specs.iter().any(ServiceSpec::is_port_based);
    let protocol = specs.iter().any(|s| !s.is_port_based());
    ports && protocol
}

/// Number of protocol-based (ICMP, ICMPv6, IP) entries. More than one
/// cannot be expressed in the dialect.
#[inline]
pub fn protocol_entry_count(specs: &[ServiceSpec]) -> usize {
    specs.iter().filter(|s| !s.is_port_based()).count()
}

// ═══════════════════════════════════════════════════════════════════════════
// Policy Constraints
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `true` if `natinbound` is consistent with `nat`.
///
/// Inbound NAT is only meaningful when NAT is enabled on the policy.
#[inline]
pub fn nat_inbound_allowed(nat_enabled: bool, nat_inbound: bool) -> bool {
    nat_enabled || !nat_inbound
}

/// Returns `true` if a protection `profile` is consistent with `profile-status`.
#[inline]
pub fn profile_allowed(policy: &Policy) -> bool {
    policy.profile.is_none() || policy.profile_status
}

/// Security profile fields set on a policy whose `utm-status` is off.
pub fn inactive_utm_profiles(policy: &Policy) -> impl Iterator<Item = &'static str> + '_ {
    policy
        .utm_profiles()
        .into_iter()
        .filter(|(_, value)| value.is_some() && !policy.utm_status)
        .map(|(field, _)| field)
}

/// Kinds a policy source address entry may resolve to.
#[inline]
pub const fn source_address_kinds() -> &'static [EntityKind] {
    &[EntityKind::Address, EntityKind::AddressGroup]
}

/// Kinds a policy destination address entry may resolve to.
///
/// Virtual IPs are valid destinations on the appliance; whether they count
/// is a dialect setting.
///
/// # Examples
///
/// ```
/// use forticonf::core::firewall::EntityKind;
/// use forticonf::core::rule_constraints::destination_address_kinds;
///
/// assert!(!destination_address_kinds(false).contains(&EntityKind::Vip));
/// assert!(destination_address_kinds(true).contains(&EntityKind::Vip));
/// ```
#[inline]
pub const fn destination_address_kinds(vip_destinations: bool) -> &'static [EntityKind] {
    if vip_destinations {
        &[EntityKind::Address, EntityKind::AddressGroup, EntityKind::Vip]
    } else {
        &[EntityKind::Address, EntityKind::AddressGroup]
    }
}

/// Kinds a policy service entry may resolve to.
#[inline]
pub const fn service_kinds() -> &'static [EntityKind] {
    &[EntityKind::Service, EntityKind::ServiceGroup]
}

// ═══════════════════════════════════════════════════════════════════════════
// Route Constraints
// ═══════════════════════════════════════════════════════════════════════════

/// Returns `true` if a route of `route_type` may carry an explicit gateway.
///
/// Dynamic routes learn the gateway from the device interface.
#[inline]
pub fn gateway_allowed(route_type: RouteType, has_gateway: bool) -> bool {
    route_type == RouteType::Static || !has_gateway
}
