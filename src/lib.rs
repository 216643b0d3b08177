//! forticonf - FortiGate-style configuration model
//!
//! Parses the appliance's `config` / `edit` / `set` / `next` / `end` dialect
//! into typed entities, validates references and field values, and writes
//! canonical text back out. `parse` followed by `serialize` is semantically
//! lossless: sections and fields the model does not cover are carried along
//! as opaque nodes.
//!
//! # Architecture
//!
//! - [`core`] - Entity model, parser, serializer, reference index and validator
//! - [`validators`] - Field-level value checks (names, interfaces, prefixes, ports)
//! - [`config`] - Dialect settings (implicit names, serializer layout)
//! - [`utils`] - Utility functions (XDG directories, atomic writes)
//!
//! # Example
//!
//! ```
//! let text = r#"
//! config firewall address
//!     edit "LAN"
//!         set subnet 10.0.0.0 255.255.255.0
//!     next
//! end
//! config firewall policy
//!     edit 7
//!         set srcaddr "LAN"
//!         set dstaddr "MISSING"
//!         set service "ALL"
//!         set action accept
//!     next
//! end
//! "#;
//!
//! let snapshot = forticonf::parse(text)?;
//! let issues = forticonf::validate(&snapshot);
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues[0].code, forticonf::IssueCode::DanglingReference);
//! assert_eq!(issues[0].field.as_deref(), Some("dstaddr"));
//!
//! let canonical = forticonf::serialize(&snapshot);
//! assert_eq!(forticonf::parse(&canonical)?, snapshot);
//! # Ok::<(), forticonf::Error>(())
//! ```

// Allow pedantic clippy warnings that are not worth fixing for this codebase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod core;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use config::{DialectConfig, load_config};
pub use core::error::{DuplicateKeyError, Error, Result};
pub use core::firewall::{Entity, EntityKey, EntityKind};
pub use core::parser::parse;
pub use core::serializer::{serialize, serialize_with};
pub use core::snapshot::Snapshot;
pub use core::verify::{IssueCode, ValidationIssue, Validator, validate};
