//! Config Admin Promotion
//!
//! Two-stage promotion of a staged configuration version over the published one.
//!
//! # Core Concepts
//!
//! - [`PromotionDiff`]: Server-computed changed paths with conflict flags
//! - [`PromotionSession`]: Review state, per-file approvals and the focused file
//! - [`ReviewState`]: `Idle → Reviewing → (Publishing | Cancelled)`
//! - [`ReviewBasis`]: Version count and staged-tree fingerprint captured when the review opened
//!
//! Conflicts are computed once, when the review opens. A review whose basis no
//! longer matches the console's snapshot is invalidated and must be re-opened.
//!
//! # Example
//!
//! ```rust
//! use cadm_promotion::{DiffEntry, PromotionDiff, PromotionSession, ReviewBasis};
//!
//! let basis = ReviewBasis::capture(3, &[]);
//! let diff = PromotionDiff::new("staged", "published", vec![
//!     DiffEntry::new("a.yaml", false),
//!     DiffEntry::new("b.yaml", false),
//! ]);
//! let session = PromotionSession::new().open_review(diff, basis.clone()).unwrap();
//! let session = session.approve("a.yaml");
//! assert!(session.publish(&basis).is_err());
//!
//! let (published, request) = session.approve("b.yaml").publish(&basis).unwrap();
//! assert_eq!(request.paths, vec!["a.yaml", "b.yaml"]);
//! assert!(published.is_publishing());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod diff;
mod error;
mod file_state;
mod session;
mod state;

pub use diff::{DiffEntry, PromotionDiff, PublishRequest, ReviewBasis};
pub use error::PromotionError;
pub use file_state::{ApprovalProgress, PromotionFileState};
pub use session::PromotionSession;
pub use state::{allowed_transitions, validate_transition, ReviewState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
