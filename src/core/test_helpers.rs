//! Shared test utilities for core module tests
//!
//! Builders for entities in their canonical shape, so tests only spell out
//! the fields they care about. This module is only compiled in test mode.

use crate::core::firewall::{
    Action, Address, AddressGroup, Entity, Policy, Route, Service, ServiceGroup, Vip,
};
use crate::core::snapshot::Snapshot;

/// One address and one policy that uses it. Validates cleanly.
pub const MINIMAL_POLICY_TEXT: &str = "\
config firewall address
    edit \"LAN\"
        set subnet 10.0.0.0 255.255.255.0
    next
end
config firewall policy
    edit 1
        set srcintf \"port1\"
        set dstintf \"port2\"
        set srcaddr \"LAN\"
        set dstaddr \"all\"
        set action accept
        set schedule \"always\"
        set service \"ALL\"
    next
end
";

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

pub fn snapshot(entities: Vec<Entity>) -> Snapshot {
    Snapshot {
        entities,
        ..Snapshot::default()
    }
}

pub fn address(name: &str, value: &str) -> Entity {
    Address::new(name, value).into()
}

pub fn address_group(name: &str, members: &[&str]) -> Entity {
    AddressGroup::new(name, strings(members)).into()
}

pub fn service(name: &str, entries: &[&str]) -> Entity {
    Service::new(name, strings(entries)).into()
}

pub fn service_group(name: &str, members: &[&str]) -> Entity {
    ServiceGroup::new(name, strings(members)).into()
}

/// Accepting policy from `port1` to `port2` on the `always` schedule. The
/// edit position equals the policy ID.
pub fn policy(number: u32, src: &[&str], dst: &[&str], services: &[&str]) -> Entity {
    Policy {
        edit: number,
        source_interfaces: strings(&["port1"]),
        destination_interfaces: strings(&["port2"]),
        source_addresses: strings(src),
        destination_addresses: strings(dst),
        action: Action::Accept,
        schedule: Some("always".to_string()),
        services: strings(services),
        ..Policy::new(number)
    }
    .into()
}

pub fn route(number: u32, destination: &str, gateway: Option<&str>) -> Entity {
    Route {
        destination: destination.to_string(),
        next_hop: gateway.map(String::from),
        ..Route::new(number)
    }
    .into()
}

pub fn vip(name: &str, external_ip: &str, mapped_ip: &str) -> Entity {
    Vip::new(name, external_ip, mapped_ip).into()
}
