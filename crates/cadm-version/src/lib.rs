//! Config Admin Versions
//!
//! Tracks the configuration versions published by the server and which one
//! the operator is looking at.
//!
//! "Latest" is structural: the version at index 0 of the newest-first list.
//! Timestamps are carried for display only and never compared, so clock skew
//! between server nodes cannot reorder versions.
//!
//! # Example
//!
//! ```rust
//! use cadm_version::{Version, VersionRegistry};
//! use chrono::Utc;
//!
//! let registry = VersionRegistry::new(vec![
//!     Version::new("v3", Utc::now(), "third"),
//!     Version::new("v2", Utc::now(), "second"),
//! ]);
//! assert_eq!(registry.latest_version_id(), Some("v3"));
//!
//! let pinned = registry.select("v2");
//! assert!(!pinned.is_latest_selected());
//! assert!(pinned.track_latest().is_latest_selected());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod registry;
mod version;

pub use registry::{is_latest_selected, VersionRegistry};
pub use version::{Version, VersionRef};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
