#[cfg(test)]
mod tests_impl {
    use crate::config::DialectConfig;
    use crate::core::firewall::{Entity, EntityKind, LogTraffic, RouteType};
    use crate::core::parser::parse;
    use crate::core::serializer::{serialize, serialize_with};
    use crate::core::snapshot::Snapshot;
    use crate::core::test_helpers::*;
    use crate::core::verify::IssueCode;

    const BRANCH_OFFICE: &str = r#"#config-version=FGT60F-7.2.5-FW-build1517:opmode=0:vdom=0
#conf_file_ver=84215
config system global
    set hostname "branch-fw"
    set timezone 04
end
config system interface
    edit "port1"
        set ip 192.0.2.2 255.255.255.0
        set allowaccess ping https ssh
    next
end
config firewall address
    edit "all"
    next
    edit "LAN"
        set uuid 0e1c7d1a-5a7b-51ee-3a5b-8f9b0a1c2d3e
        set associated-interface "internal"
        set subnet 10.10.0.0 255.255.255.0
    next
    edit "DHCP pool"
        set type iprange
        set start-ip 10.10.0.100
        set end-ip 10.10.0.199
    next
    edit "updates"
        set type fqdn
        set fqdn "update.example.com"
    next
end
config firewall addrgrp
    edit "INSIDE"
        set member "LAN" "DHCP pool"
        set comment "Everything behind port1"
    next
end
config firewall service custom
    edit "WEB"
        set category "Web Access"
        set tcp-portrange 80 443 8080-8090
    next
    edit "PING"
        set protocol ICMP
        set icmptype 8
    next
end
config firewall service group
    edit "ADMIN"
        set member "WEB" "PING"
    next
end
config firewall vip
    edit "web-server"
        set extip 192.0.2.10
        set extintf "wan1"
        set mappedip "10.10.0.10"
    next
end
config firewall policy
    edit 4
        set name "outbound"
        set srcintf "internal"
        set dstintf "wan1"
        set srcaddr "INSIDE"
        set dstaddr "all"
        set action accept
        set schedule "always"
        set service "ALL"
        set logtraffic all
        set nat enable
    next
    edit 2
        set srcintf "internal"
        set dstintf "wan1"
        set srcaddr "LAN"
        set dstaddr "updates"
        set action accept
        set schedule "always"
        set service "ADMIN"
        set utm-status enable
        set av-profile "default"
    next
end
config router static
    edit 1
        set gateway 192.0.2.1
        set device "wan1"
    next
    edit 2
        set dst 172.16.0.0 255.240.0.0
        set device "wan2"
        set dynamic-gateway enable
    next
end
"#;

    #[test]
    fn test_branch_office_parses_cleanly() {
        let snapshot = parse(BRANCH_OFFICE).unwrap();

        assert_eq!(snapshot.comments.len(), 2);
        assert_eq!(snapshot.opaque_sections.len(), 2);
        assert_eq!(snapshot.len(), 13);
        assert_eq!(snapshot.index().len(), 13);

        let issues = snapshot.validate();
        assert!(issues.is_empty(), "unexpected issues: {issues:#?}");
    }

    #[test]
    fn test_branch_office_field_mapping() {
        let snapshot = parse(BRANCH_OFFICE).unwrap();

        let values: Vec<_> = snapshot.addresses().map(|a| a.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "0.0.0.0/0",
                "10.10.0.0/24",
                "10.10.0.100-10.10.0.199",
                "update.example.com"
            ]
        );

        let web = snapshot.services().next().unwrap();
        assert_eq!(web.entries, vec!["tcp/80", "tcp/443", "tcp/8080-8090"]);
        assert_eq!(web.category.as_deref(), Some("Web Access"));

        let outbound = snapshot.policies().next().unwrap();
        assert_eq!((outbound.number, outbound.edit), (4, 1));
        assert_eq!(outbound.log_traffic, Some(LogTraffic::All));
        assert!(outbound.nat_enabled);
        // `name` is not modeled
        assert_eq!(outbound.extensions.len(), 1);

        let routes: Vec<_> = snapshot.routes().collect();
        assert_eq!(routes[0].destination, "0.0.0.0/0");
        assert_eq!(routes[1].destination, "172.16.0.0/12");
        assert_eq!(routes[1].route_type, RouteType::Dynamic);
    }

    #[test]
    fn test_branch_office_round_trip() {
        let snapshot = parse(BRANCH_OFFICE).unwrap();
        let canonical = serialize(&snapshot);
        let reparsed = parse(&canonical).unwrap();

        assert_eq!(reparsed, snapshot);
        assert_eq!(serialize(&reparsed), canonical);
        assert!(canonical.starts_with("#config-version="));
        assert!(canonical.contains("        set allowaccess ping https ssh\n"));
    }

    #[test]
    fn test_policies_emitted_in_evaluation_order() {
        let snapshot = parse(BRANCH_OFFICE).unwrap();
        let canonical = serialize(&snapshot);

        let first = canonical.find("    edit 4\n").unwrap();
        let second = canonical.find("    edit 2\n        set srcintf").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_member_chunking_survives_round_trip() {
        let members: Vec<String> = (0..5).map(|i| format!("host-{i}")).collect();
        let mut entities: Vec<Entity> = members
            .iter()
            .map(|name| address(name, "10.0.0.1/32"))
            .collect();
        let names: Vec<&str> = members.iter().map(String::as_str).collect();
        entities.push(address_group("HOSTS", &names));
        let snapshot = snapshot(entities);

        let config = DialectConfig {
            member_chunk_size: 2,
            ..DialectConfig::default()
        };
        let text = serialize_with(&snapshot, &config);

        assert_eq!(text.matches("set member").count(), 1);
        assert_eq!(text.matches("append member").count(), 2);
        assert_eq!(parse(&text).unwrap(), snapshot);
    }

    #[test]
    fn test_vip_destinations_follow_config() {
        let snapshot = snapshot(vec![
            address("LAN", "10.0.0.0/24"),
            vip("web-server", "192.0.2.10", "10.0.0.10"),
            policy(1, &["all"], &["web-server"], &["ALL"]),
        ]);

        let strict = snapshot.validate();
        assert_eq!(strict.len(), 1);
        assert_eq!(strict[0].code, IssueCode::DanglingReference);

        let config = DialectConfig {
            vip_destinations: true,
            ..DialectConfig::default()
        };
        assert!(snapshot.validate_with(&config).is_empty());
    }

    #[test]
    fn test_mutation_then_validate_and_serialize() {
        let mut snapshot = Snapshot::parse(MINIMAL_POLICY_TEXT).unwrap();
        snapshot
            .remove(EntityKind::Address, &"LAN".into())
            .unwrap();

        let issues = snapshot.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field.as_deref(), Some("srcaddr"));

        snapshot.insert(address_group("LAN", &["all"])).unwrap();
        assert!(snapshot.validate().is_empty());

        let reparsed = Snapshot::parse(&snapshot.to_text()).unwrap();
        assert_eq!(reparsed.address_groups().count(), 1);
        assert_eq!(reparsed.policies().count(), 1);
    }
}

#[cfg(test)]
mod property_tests {
    use crate::core::firewall::{
        Action, Address, AddressGroup, Entity, LogTraffic, Policy, Route, RouteType, Service,
        ServiceGroup, Vip,
    };
    use crate::core::lexer::{Item, tokenize};
    use crate::core::parser::parse;
    use crate::core::serializer::{serialize, word};
    use crate::core::snapshot::Snapshot;
    use proptest::prelude::*;
    use std::net::Ipv4Addr;

    fn arb_name() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9_. \"\\\\-]{0,20}"
    }

    fn arb_names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(arb_name(), 1..4)
    }

    prop_compose! {
        fn arb_network()(ip in any::<u32>(), prefix in 0u8..=32) -> String {
            let mask = if prefix == 0 { 0 } else { u32::MAX << (32 - prefix) };
            format!("{}/{prefix}", Ipv4Addr::from(ip & mask))
        }
    }

    prop_compose! {
        fn arb_range()(a in any::<u32>(), b in any::<u32>()) -> String {
            format!("{}-{}", Ipv4Addr::from(a.min(b)), Ipv4Addr::from(a.max(b)))
        }
    }

    fn arb_address_value() -> impl Strategy<Value = String> {
        prop_oneof![
            arb_network(),
            any::<u32>().prop_map(|ip| Ipv4Addr::from(ip).to_string()),
            arb_range(),
            "[a-z]{1,10}\\.example\\.com",
        ]
    }

    prop_compose! {
        fn arb_address()(
            name in arb_name(),
            value in arb_address_value(),
            interface in proptest::option::of("port[1-9]"),
        ) -> Entity {
            Address { interface, ..Address::new(name, value) }.into()
        }
    }

    prop_compose! {
        fn arb_address_group()(
            name in arb_name(),
            members in arb_names(),
            comment in proptest::option::of(arb_name()),
        ) -> Entity {
            AddressGroup { comment, ..AddressGroup::new(name, members) }.into()
        }
    }

    prop_compose! {
        fn arb_port_range()(lo in 1u16..=65535, span in 0u16..100, spelled_out in any::<bool>()) -> String {
            let hi = lo.saturating_add(span);
            if hi == lo && !spelled_out { lo.to_string() } else { format!("{lo}-{hi}") }
        }
    }

    prop_compose! {
        fn arb_port_entry()(
            protocol in prop_oneof![Just("tcp"), Just("TCP"), Just("udp"), Just("Udp"), Just("sctp")],
            destination in arb_port_range(),
            source in proptest::option::of(arb_port_range()),
        ) -> String {
            match source {
                Some(src) => format!("{protocol}/{destination}:{src}"),
                None => format!("{protocol}/{destination}"),
            }
        }
    }

    fn arb_protocol_entry() -> impl Strategy<Value = String> {
        prop_oneof![
            (0u8..=255).prop_map(|t| format!("icmp/{t}")),
            (0u8..=255).prop_map(|n| format!("IP/{n}")),
            Just("ICMP6".to_string()),
            Just("ip".to_string()),
        ]
    }

    prop_compose! {
        /// Port entries in arbitrary protocol order, optionally preceded by
        /// one protocol entry.
        fn arb_service_entries()(
            protocol in proptest::option::of(arb_protocol_entry()),
            ports in prop::collection::vec(arb_port_entry(), 0..5),
        ) -> Vec<String> {
            protocol.into_iter().chain(ports).collect()
        }
    }

    prop_compose! {
        fn arb_service()(
            name in arb_name(),
            entries in arb_service_entries(),
            category in proptest::option::of(arb_name()),
        ) -> Entity {
            Service { category, ..Service::new(name, entries) }.into()
        }
    }

    prop_compose! {
        fn arb_vip()(
            name in arb_name(),
            ext in any::<u32>(),
            mapped in prop::collection::vec(arb_range(), 1..3),
        ) -> Entity {
            Vip {
                mapped_ip: mapped,
                ..Vip::new(name, Ipv4Addr::from(ext).to_string(), "")
            }
            .into()
        }
    }

    prop_compose! {
        fn arb_policy()(
            number in 1u32..10_000,
            src in arb_names(),
            dst in arb_names(),
            services in arb_names(),
            deny in any::<bool>(),
            nat in any::<bool>(),
            disabled in any::<bool>(),
            log_traffic in proptest::option::of(prop_oneof![
                Just(LogTraffic::All),
                Just(LogTraffic::Utm),
                Just(LogTraffic::Disable),
            ]),
            comments in proptest::option::of(arb_name()),
            edit in prop_oneof![Just(0u32), 1u32..8],
        ) -> Entity {
            Policy {
                edit,
                source_interfaces: vec!["port1".to_string()],
                destination_interfaces: vec!["port2".to_string()],
                source_addresses: src,
                destination_addresses: dst,
                services,
                action: if deny { Action::Deny } else { Action::Accept },
                schedule: Some("always".to_string()),
                nat_enabled: nat,
                disabled,
                log_traffic,
                comments,
                ..Policy::new(number)
            }
            .into()
        }
    }

    prop_compose! {
        fn arb_route()(
            number in 1u32..1000,
            destination in arb_network(),
            gateway in proptest::option::of(any::<u32>()),
        ) -> Entity {
            let route_type = if gateway.is_some() { RouteType::Static } else { RouteType::Dynamic };
            Route {
                route_type,
                destination,
                next_hop: gateway.map(|g| Ipv4Addr::from(g).to_string()),
                interface: Some("wan1".to_string()),
                ..Route::new(number)
            }
            .into()
        }
    }

    prop_compose! {
        fn arb_entities()(
            addresses in prop::collection::vec(arb_address(), 0..4),
            groups in prop::collection::vec(arb_address_group(), 0..3),
            services in prop::collection::vec(arb_service(), 0..3),
            service_groups in prop::collection::vec(arb_names(), 0..2),
            vips in prop::collection::vec(arb_vip(), 0..2),
            policies in prop::collection::vec(arb_policy(), 0..4),
            routes in prop::collection::vec(arb_route(), 0..3),
        ) -> Vec<Entity> {
            let mut entities = Vec::new();
            entities.extend(addresses);
            entities.extend(groups);
            entities.extend(services);
            entities.extend(
                service_groups
                    .into_iter()
                    .enumerate()
                    .map(|(i, members)| ServiceGroup::new(format!("sg{i}"), members).into()),
            );
            entities.extend(vips);
            entities.extend(policies);
            entities.extend(routes);
            entities
        }
    }

    /// Entities of every kind in arbitrary order; policy `edit` values may
    /// repeat or be unset.
    fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
        arb_entities().prop_shuffle().prop_map(|entities| Snapshot {
            entities,
            ..Snapshot::default()
        })
    }

    proptest! {
        #[test]
        fn test_parse_serialize_round_trip(snapshot in arb_snapshot()) {
            let text = serialize(&snapshot);
            let reparsed = parse(&text).unwrap();
            prop_assert_eq!(reparsed, snapshot.normalized());
        }

        #[test]
        fn test_normalize_is_a_fixed_point(snapshot in arb_snapshot()) {
            let normalized = snapshot.normalized();
            prop_assert_eq!(normalized.normalized(), normalized.clone());
            prop_assert_eq!(serialize(&normalized), serialize(&snapshot));
        }

        #[test]
        fn test_serialize_is_idempotent(snapshot in arb_snapshot()) {
            let once = serialize(&snapshot);
            let twice = serialize(&parse(&once).unwrap());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_word_survives_lexing(value in "[ -~\t\n]{0,30}") {
            let text = format!("set comment {}\n", word(&value));
            let items = tokenize(&text).unwrap();
            prop_assert_eq!(items.len(), 1);
            match &items[0] {
                Item::Line(line) => prop_assert_eq!(&line.args, &vec!["comment".to_string(), value]),
                Item::Comment { .. } => prop_assert!(false, "statement lexed as comment"),
            }
        }

        #[test]
        fn test_parse_never_panics(text in "[ -~\n]{0,200}") {
            let _ = parse(&text);
        }
    }
}
