//! Config Admin Mappings
//!
//! Agent mapping rules route an agent on a source branch to the configuration
//! file it should read. Rules are ordered and the first match wins.
//!
//! # Core Concepts
//!
//! - [`MappingEntry`]: One rule (`sourceBranches`, `agentPattern`, `targetFile`)
//! - [`to_text`] / [`from_text`]: Order-preserving block YAML, the form operators edit
//! - [`MappingsModel`]: The current rule set plus first-match lookup
//! - [`UnsavedChanges`]: Persistent map of pending edits, keyed by entity id
//!
//! # Example
//!
//! ```rust
//! use cadm_mappings::{from_text, to_text, MappingEntry};
//!
//! let rules = vec![MappingEntry::new(vec!["main".into()], "web-.*", "web.yaml")];
//! let text = to_text(&rules).unwrap();
//! assert_eq!(from_text(&text).unwrap(), rules);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod codec;
mod error;
mod model;
mod rule;
mod unsaved;

pub use codec::{from_text, to_text};
pub use error::{MappingsError, TextLocation};
pub use model::MappingsModel;
pub use rule::{MappingEntry, ANY_BRANCH};
pub use unsaved::{changed_keys, has_unsaved_changes, UnsavedChanges};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
