//! Reference index over a snapshot's entities
//!
//! A read-only view mapping kind + key to the entity that owns it. Built on
//! demand from borrowed entities and never the source of truth: rebuild it
//! after mutating the snapshot.
//!
//! Group member edges are followed by name through the index, so groups that
//! list each other form cycles in the index graph rather than in ownership.
//! [`ReferenceIndex::detect_cycles`] reports them.

use crate::core::error::{DuplicateKeyError, Error, Result};
use crate::core::firewall::{Entity, EntityKey, EntityKind};
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Default)]
pub struct ReferenceIndex<'a> {
    named: HashMap<EntityKind, HashMap<&'a str, &'a Entity>>,
    numbered: HashMap<EntityKind, HashMap<u32, &'a Entity>>,
    len: usize,
}

impl<'a> ReferenceIndex<'a> {
    /// Indexes `entities`, failing on the first kind + key collision.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateKeyError`] naming the first colliding kind and key.
    pub fn build(
        entities: impl IntoIterator<Item = &'a Entity>,
    ) -> std::result::Result<Self, DuplicateKeyError> {
        let (index, duplicates) = Self::build_lenient(entities);
        match duplicates.first() {
            Some(dup) => Err(DuplicateKeyError {
                kind: dup.kind(),
                key: dup.key(),
            }),
            None => Ok(index),
        }
    }

    /// Indexes `entities`, keeping the first occurrence of every key and
    /// returning later occurrences separately.
    pub fn build_lenient(entities: impl IntoIterator<Item = &'a Entity>) -> (Self, Vec<&'a Entity>) {
        let mut index = Self::default();
        let mut duplicates = Vec::new();

        for entity in entities {
            let kind = entity.kind();
            let fresh = match (entity.name(), entity.number()) {
                (Some(name), _) => {
                    let slot = index.named.entry(kind).or_default();
                    !slot.contains_key(name) && slot.insert(name, entity).is_none()
                }
                (None, Some(number)) => {
                    let slot = index.numbered.entry(kind).or_default();
                    !slot.contains_key(&number) && slot.insert(number, entity).is_none()
                }
                (None, None) => false,
            };

            if fresh {
                index.len += 1;
            } else {
                duplicates.push(entity);
            }
        }

        (index, duplicates)
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Looks up an entity by kind and key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when nothing of that kind has the key.
    pub fn resolve(&self, kind: EntityKind, key: &EntityKey) -> Result<&'a Entity> {
        let found = match key {
            EntityKey::Name(name) => self.resolve_name(kind, name),
            EntityKey::Number(number) => self
                .numbered
                .get(&kind)
                .and_then(|slot| slot.get(number))
                .copied(),
        };

        found.ok_or_else(|| Error::NotFound {
            kind,
            key: key.clone(),
        })
    }

    pub fn resolve_name(&self, kind: EntityKind, name: &str) -> Option<&'a Entity> {
        self.named
            .get(&kind)
            .and_then(|slot| slot.get(name))
            .copied()
    }

    /// Resolves `name` against each kind in order, returning the first hit.
    pub fn resolve_any(&self, kinds: &[EntityKind], name: &str) -> Option<&'a Entity> {
        kinds.iter().find_map(|kind| self.resolve_name(*kind, name))
    }

    pub fn contains(&self, kind: EntityKind, name: &str) -> bool {
        self.resolve_name(kind, name).is_some()
    }

    /// Returns every group of `kind` that can reach itself through member edges.
    ///
    /// Each group is the root of its own depth-first walk with a fresh
    /// visited set, so a group that merely points into a cycle is not
    /// reported. A group listing itself is a cycle of length one.
    pub fn detect_cycles(&self, kind: EntityKind) -> BTreeSet<String> {
        let Some(groups) = self.named.get(&kind) else {
            return BTreeSet::new();
        };

        groups
            .keys()
            .filter(|root| self.reaches_itself(kind, root))
            .map(|root| (*root).to_string())
            .collect()
    }

    fn members_of(&self, kind: EntityKind, name: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        self.resolve_name(kind, name)
            .map(Entity::members)
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
    }

    fn reaches_itself(&self, kind: EntityKind, root: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&str> = self.members_of(kind, root).collect();

        while let Some(name) = pending.pop() {
            if name == root {
                return true;
            }
            if visited.insert(name) {
                pending.extend(self.members_of(kind, name));
            }
        }

        false
    }
}
