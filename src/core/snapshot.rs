//! Caller-owned configuration snapshot
//!
//! A [`Snapshot`] owns every entity parsed from one configuration text plus
//! the pieces the model does not interpret (header comments and opaque
//! sections). All core operations take a snapshot explicitly; there is no
//! process-wide configuration state.
//!
//! # Canonical form
//!
//! Serialization writes values in one canonical spelling, so a snapshot
//! built by hand can come back from `parse(serialize(..))` looking different.
//! [`Snapshot::normalize`] applies the same rewriting in place:
//!
//! - address values: a bare host becomes `/32`
//! - service entries: lowercase, port entries grouped by protocol in
//!   first-appearance order, protocol entries last
//! - route destinations: CIDR text as the network prints it
//! - policies: `edit` renumbered 1..=n in table order, `edit` 0 last
//! - entities: ordered by kind, policies by `edit`
//!
//! For any snapshot `s` that validates cleanly,
//! `parse(&serialize(&s)) == s.normalized()`.

use crate::config::DialectConfig;
use crate::core::error::{DuplicateKeyError, Error, Result};
use crate::core::firewall::{
    Address, AddressGroup, ConfigBlock, Entity, EntityKey, EntityKind, Policy, Route, Service,
    ServiceGroup, Vip,
};
use crate::core::index::ReferenceIndex;
use crate::core::verify::{ValidationIssue, Validator};
use crate::core::{parser, serializer};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Comment lines that preceded the first `config` block
    #[serde(default)]
    pub comments: Vec<String>,
    /// Modeled entities in source order
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// Top-level sections outside the modeled schema, kept as written
    #[serde(default)]
    pub opaque_sections: Vec<ConfigBlock>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBlock`] on any structural failure.
    pub fn parse(text: &str) -> Result<Self> {
        parser::parse(text)
    }

    /// Canonical configuration text with default dialect settings.
    pub fn to_text(&self) -> String {
        serializer::serialize(self)
    }

    pub fn to_text_with(&self, config: &DialectConfig) -> String {
        serializer::serialize_with(self, config)
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        self.validate_with(&DialectConfig::default())
    }

    pub fn validate_with(&self, config: &DialectConfig) -> Vec<ValidationIssue> {
        Validator::new(config).validate(self)
    }

    /// Builds a reference index over the current entities. Later duplicates
    /// of a key are left out; [`Snapshot::validate`] reports them.
    pub fn index(&self) -> ReferenceIndex<'_> {
        ReferenceIndex::build_lenient(&self.entities).0
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First entity of `kind` identified by `key`.
    pub fn get(&self, kind: EntityKind, key: &EntityKey) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.kind() == kind && e.has_key(key))
    }

    pub fn get_mut(&mut self, kind: EntityKind, key: &EntityKey) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.kind() == kind && e.has_key(key))
    }

    /// Adds an entity in canonical form (see [`Entity::normalize`]).
    ///
    /// A policy with `edit` 0 is placed at the end of the policy table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateKey`] if an entity of the same kind and key
    /// already exists; the snapshot is left unchanged.
    pub fn insert(&mut self, entity: impl Into<Entity>) -> Result<()> {
        let mut entity = entity.into();
        if self.entities.iter().any(|e| e.same_object(&entity)) {
            return Err(DuplicateKeyError {
                kind: entity.kind(),
                key: entity.key(),
            }
            .into());
        }

        if let Entity::Policy(policy) = &mut entity
            && policy.edit == 0
        {
            policy.edit = self.last_policy_edit() + 1;
        }
        entity.normalize();

        debug!("Inserting {} {}", entity.kind(), entity.key());
        self.entities.push(entity);
        Ok(())
    }

    /// Removes and returns the first entity of `kind` identified by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such entity exists.
    pub fn remove(&mut self, kind: EntityKind, key: &EntityKey) -> Result<Entity> {
        let position = self
            .entities
            .iter()
            .position(|e| e.kind() == kind && e.has_key(key))
            .ok_or_else(|| Error::NotFound {
                kind,
                key: key.clone(),
            })?;
        Ok(self.entities.remove(position))
    }

    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Address(a) => Some(a),
            _ => None,
        })
    }

    pub fn address_groups(&self) -> impl Iterator<Item = &AddressGroup> {
        self.entities.iter().filter_map(|e| match e {
            Entity::AddressGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Service(s) => Some(s),
            _ => None,
        })
    }

    pub fn service_groups(&self) -> impl Iterator<Item = &ServiceGroup> {
        self.entities.iter().filter_map(|e| match e {
            Entity::ServiceGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn vips(&self) -> impl Iterator<Item = &Vip> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Vip(v) => Some(v),
            _ => None,
        })
    }

    /// Policies in source order (not necessarily `edit` order).
    pub fn policies(&self) -> impl Iterator<Item = &Policy> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Policy(p) => Some(p),
            _ => None,
        })
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.entities.iter().filter_map(|e| match e {
            Entity::Route(r) => Some(r),
            _ => None,
        })
    }

    fn last_policy_edit(&self) -> u32 {
        self.policies().map(|p| p.edit).max().unwrap_or(0)
    }

    /// Reassigns policy `edit` positions to 1..=n, keeping the current
    /// evaluation order. Ties keep source order; policies without a position
    /// (`edit` 0) go last.
    pub fn renumber_policies(&mut self) {
        let mut order: Vec<(bool, u32, usize)> = self
            .entities
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                Entity::Policy(p) => Some((p.edit == 0, p.edit, i)),
                _ => None,
            })
            .collect();
        order.sort_unstable();

        for (edit, (_, _, i)) in (1..).zip(order) {
            if let Entity::Policy(p) = &mut self.entities[i] {
                p.edit = edit;
            }
        }
    }

    /// Rewrites the snapshot in canonical form (see the module docs).
    pub fn normalize(&mut self) {
        for entity in &mut self.entities {
            entity.normalize();
        }
        self.renumber_policies();
        self.entities.sort_by_key(|e| {
            let edit = match e {
                Entity::Policy(p) => p.edit,
                _ => 0,
            };
            (e.kind(), edit)
        });
    }

    /// Canonical copy of this snapshot.
    pub fn normalized(&self) -> Self {
        let mut copy = self.clone();
        copy.normalize();
        copy
    }

    /// Parses `text` and merges it into this snapshot. Policies from `text`
    /// are placed after the existing policy table.
    ///
    /// Either everything is merged or nothing is.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedBlock`] if `text` does not parse
    /// - [`Error::DuplicateKey`] if an entity in `text` collides with one
    ///   already in the snapshot
    pub fn extend_from_text(&mut self, text: &str) -> Result<()> {
        let incoming = parser::parse(text)?;

        if let Some(clash) = incoming
            .entities
            .iter()
            .find(|new| self.entities.iter().any(|old| old.same_object(new)))
        {
            return Err(DuplicateKeyError {
                kind: clash.kind(),
                key: clash.key(),
            }
            .into());
        }

        let offset = self.last_policy_edit();
        debug!(
            "Merging {} entities and {} opaque sections",
            incoming.entities.len(),
            incoming.opaque_sections.len()
        );

        if self.comments.is_empty() {
            self.comments = incoming.comments;
        }
        self.opaque_sections.extend(incoming.opaque_sections);
        self.entities
            .extend(incoming.entities.into_iter().map(|mut entity| {
                if let Entity::Policy(p) = &mut entity {
                    p.edit += offset;
                }
                entity
            }));
        Ok(())
    }

    /// SHA-256 of the canonical text with default dialect settings, as
    /// lowercase hex.
    ///
    /// Two snapshots that serialize identically share a fingerprint, so
    /// reformatting a file does not change it.
    pub fn fingerprint(&self) -> String {
        self.fingerprint_with(&DialectConfig::default())
    }

    /// Fingerprint of the text [`Snapshot::to_text_with`] produces.
    pub fn fingerprint_with(&self, config: &DialectConfig) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_text_with(config).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Line diff from this snapshot's canonical text to `other`'s.
    ///
    /// Each line is prefixed with `- `, `+ ` or two spaces. Returns an empty
    /// string when the canonical texts are identical.
    pub fn diff(&self, other: &Snapshot) -> String {
        let old_text = self.to_text();
        let new_text = other.to_text();
        if old_text == new_text {
            return String::new();
        }

        let diff = similar::TextDiff::from_lines(&old_text, &new_text);
        let mut result = String::new();
        for change in diff.iter_all_changes() {
            let sign = match change.tag() {
                similar::ChangeTag::Delete => "- ",
                similar::ChangeTag::Insert => "+ ",
                similar::ChangeTag::Equal => "  ",
            };
            let _ = write!(result, "{sign}{change}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_helpers::*;

    #[test]
    fn test_insert_rejects_existing_key() {
        let mut snap = snapshot(vec![address("LAN", "10.0.0.0/24")]);
        let err = snap
            .insert(Address::new("LAN", "10.1.0.0/24"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(_)));
        assert_eq!(snap.len(), 1);

        // Same name in another kind is a different object
        snap.insert(AddressGroup::new("LAN", vec!["LAN".to_string()]))
            .unwrap();
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn test_insert_policy_appends_to_table() {
        let mut snap = Snapshot::parse(MINIMAL_POLICY_TEXT).unwrap();
        snap.insert(Policy::new(42)).unwrap();

        let last = snap.policies().last().unwrap();
        assert_eq!((last.number, last.edit), (42, 2));
    }

    #[test]
    fn test_get_and_remove() {
        let mut snap = snapshot(vec![address("LAN", "10.0.0.0/24"), route(1, "0.0.0.0/0", None)]);
        let key = EntityKey::Number(1);
        assert!(snap.get(EntityKind::Route, &key).is_some());
        assert!(snap.get(EntityKind::Policy, &key).is_none());

        if let Some(Entity::Address(a)) = snap.get_mut(EntityKind::Address, &"LAN".into()) {
            a.interface = Some("port1".to_string());
        }
        assert_eq!(snap.addresses().next().unwrap().interface.as_deref(), Some("port1"));

        let removed = snap.remove(EntityKind::Route, &key).unwrap();
        assert_eq!(removed.kind(), EntityKind::Route);
        assert!(matches!(
            snap.remove(EntityKind::Route, &key),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_typed_iterators() {
        let snap = snapshot(vec![
            address("A", "10.0.0.1/32"),
            address_group("G", &["A"]),
            service("S", &["tcp/443"]),
            service_group("SG", &["S"]),
            vip("V", "203.0.113.5", "10.0.0.5"),
            policy(1, &["A"], &["G"], &["SG"]),
            route(1, "0.0.0.0/0", Some("192.0.2.1")),
        ]);
        assert_eq!(snap.addresses().count(), 1);
        assert_eq!(snap.address_groups().count(), 1);
        assert_eq!(snap.services().count(), 1);
        assert_eq!(snap.service_groups().count(), 1);
        assert_eq!(snap.vips().count(), 1);
        assert_eq!(snap.policies().count(), 1);
        assert_eq!(snap.routes().count(), 1);
        assert_eq!(snap.index().len(), 7);
    }

    #[test]
    fn test_renumber_policies_keeps_order() {
        let mut first = Policy::new(10);
        first.edit = 7;
        let mut second = Policy::new(3);
        second.edit = 2;
        let mut snap = snapshot(vec![first.into(), second.into()]);

        snap.renumber_policies();

        let edits: Vec<_> = snap.policies().map(|p| (p.number, p.edit)).collect();
        assert_eq!(edits, vec![(10, 2), (3, 1)]);
    }

    #[test]
    fn test_renumber_puts_unplaced_policies_last() {
        let mut placed = Policy::new(1);
        placed.edit = 4;
        let unplaced = Policy::new(2);
        let mut snap = snapshot(vec![unplaced.into(), placed.into()]);

        snap.renumber_policies();

        let edits: Vec<_> = snap.policies().map(|p| (p.number, p.edit)).collect();
        assert_eq!(edits, vec![(2, 2), (1, 1)]);
    }

    #[test]
    fn test_insert_normalizes_values() {
        let mut snap = Snapshot::new();
        snap.insert(Address::new("h", "10.0.0.1")).unwrap();
        snap.insert(Service::new(
            "DNS",
            vec!["UDP/53".to_string(), "tcp/53".to_string(), "udp/5353".to_string()],
        ))
        .unwrap();

        assert_eq!(snap.addresses().next().unwrap().value, "10.0.0.1/32");
        assert_eq!(
            snap.services().next().unwrap().entries,
            vec!["udp/53", "udp/5353", "tcp/53"]
        );
        assert_eq!(Snapshot::parse(&snap.to_text()).unwrap(), snap);
    }

    #[test]
    fn test_normalized_matches_reparse() {
        let mut unplaced = Policy::new(8);
        unplaced.source_addresses = vec!["h".to_string()];
        unplaced.destination_addresses = vec!["all".to_string()];
        unplaced.services = vec!["MIXED".to_string()];
        let mut first = unplaced.clone();
        first.number = 3;
        first.edit = 5;

        let snap = snapshot(vec![
            unplaced.into(),
            service("MIXED", &["tcp/80", "udp/53", "tcp/443"]),
            address("h", "10.0.0.1"),
            first.into(),
            route(1, "10.2.0.0/16", Some("192.0.2.1")),
        ]);
        assert!(snap.validate().is_empty(), "{:#?}", snap.validate());

        let reparsed = Snapshot::parse(&snap.to_text()).unwrap();
        let normalized = snap.normalized();
        assert_eq!(reparsed, normalized);
        assert_eq!(normalized.normalized(), normalized);

        let policies: Vec<_> = normalized.policies().map(|p| (p.number, p.edit)).collect();
        assert_eq!(policies, vec![(3, 1), (8, 2)]);
        assert_eq!(
            normalized.services().next().unwrap().entries,
            vec!["tcp/80", "tcp/443", "udp/53"]
        );
    }

    #[test]
    fn test_extend_from_text_offsets_policy_edits() {
        let mut snap = Snapshot::parse(MINIMAL_POLICY_TEXT).unwrap();
        snap.extend_from_text(
            "config firewall policy\n    edit 9\n        set action deny\n    next\nend\n",
        )
        .unwrap();

        let edits: Vec<_> = snap.policies().map(|p| (p.number, p.edit)).collect();
        assert_eq!(edits, vec![(1, 1), (9, 2)]);
    }

    #[test]
    fn test_extend_from_text_is_atomic() {
        let mut snap = Snapshot::parse(MINIMAL_POLICY_TEXT).unwrap();
        let before = snap.clone();

        let clash = "config firewall address\n    edit \"LAN\"\n    next\nend\n\
                     config firewall address\n    edit \"NEW\"\n    next\nend\n";
        assert!(matches!(
            snap.extend_from_text(clash),
            Err(Error::DuplicateKey(_))
        ));
        assert_eq!(snap, before);

        assert!(matches!(
            snap.extend_from_text("config firewall address\n    edit \"X\"\n"),
            Err(Error::MalformedBlock { .. })
        ));
        assert_eq!(snap, before);
    }

    #[test]
    fn test_fingerprint_ignores_formatting() {
        let snap = Snapshot::parse(MINIMAL_POLICY_TEXT).unwrap();
        let reformatted = Snapshot::parse(&snap.to_text()).unwrap();
        assert_eq!(snap.fingerprint(), reformatted.fingerprint());
        assert_eq!(snap.fingerprint().len(), 64);

        let mut changed = snap.clone();
        changed.insert(Address::new("EXTRA", "10.9.9.0/24")).unwrap();
        assert_ne!(snap.fingerprint(), changed.fingerprint());
    }

    #[test]
    fn test_fingerprint_follows_dialect_settings() {
        let snap = snapshot(vec![address_group("G", &["a", "b", "c"])]);
        let chunked = DialectConfig {
            member_chunk_size: 1,
            ..DialectConfig::default()
        };

        assert_eq!(snap.fingerprint(), snap.fingerprint_with(&DialectConfig::default()));
        assert_ne!(snap.fingerprint(), snap.fingerprint_with(&chunked));

        let mut hasher = Sha256::new();
        hasher.update(snap.to_text_with(&chunked).as_bytes());
        assert_eq!(snap.fingerprint_with(&chunked), format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn test_diff_marks_changed_lines() {
        let snap = Snapshot::parse(MINIMAL_POLICY_TEXT).unwrap();
        assert!(snap.diff(&snap.clone()).is_empty());

        let mut changed = snap.clone();
        if let Some(Entity::Address(a)) = changed.get_mut(EntityKind::Address, &"LAN".into()) {
            a.value = "10.0.1.0/24".to_string();
        }
        let diff = snap.diff(&changed);
        assert!(diff.contains("- "));
        assert!(diff.contains("+         set subnet 10.0.1.0 255.255.255.0"));
    }
}
