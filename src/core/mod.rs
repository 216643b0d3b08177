//! Core configuration model and transformations
//!
//! Text goes in through the parser, becomes a [`snapshot::Snapshot`] of
//! entities, is checked by the validator and comes back out through the
//! serializer:
//!
//! - [`firewall`]: Entity model (addresses, groups, services, VIPs, policies, routes)
//! - [`parser`]: Configuration text to snapshot
//! - [`serializer`]: Snapshot to canonical configuration text
//! - [`snapshot`]: Caller-owned entity collection with accessors and mutators
//! - [`index`]: Name/number lookup and group cycle detection
//! - [`verify`]: Semantic validation producing [`verify::ValidationIssue`]s
//! - [`rule_constraints`]: Business rules for valid field combinations
//! - [`error`]: Error types

pub mod error;
pub mod firewall;
pub mod index;
pub(crate) mod lexer;
pub mod parser;
pub mod rule_constraints;
pub mod serializer;
pub mod snapshot;
pub mod verify;

#[cfg(test)]
pub mod test_helpers;

#[cfg(test)]
mod tests;
