//! Config Admin Core
//!
//! The console's business state, kept out of the rendering layer:
//!
//! - [`ConsoleState`]: Immutable snapshot of tree, versions, mappings, pending
//!   edits and the promotion review
//! - [`ConsoleAction`] + [`reduce`]: Closed set of tagged actions and the single
//!   reducer applying them
//! - [`ConsoleStore`]: Current snapshot plus [`StateObserver`] notification
//! - [`ConfigServer`]: The network collaborator, at its interface only
//! - [`ConsoleService`]: Async flows that fetch from the server and dispatch
//!
//! # Example
//!
//! ```rust
//! use cadm_core::{reduce, ConsoleAction, ConsoleState};
//! use cadm_tree::TreeNode;
//!
//! let state = ConsoleState::default();
//! let state = reduce(&state, ConsoleAction::TreeLoaded(vec![
//!     TreeNode::directory("docs", vec![TreeNode::file("guide.yaml")]),
//! ])).unwrap();
//! let state = reduce(&state, ConsoleAction::SelectPath("docs/guide.yaml".into())).unwrap();
//! assert_eq!(state.selected_node().map(|n| n.name()), Some("guide.yaml"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod action;
pub mod client;
pub mod config;
pub mod error;
pub mod reducer;
pub mod service;
pub mod state;
pub mod store;

pub use action::ConsoleAction;
pub use client::{ClientError, ConfigServer};
pub use config::{ConfigError, ConsoleConfig, LogFormat};
pub use error::ConsoleError;
pub use reducer::reduce;
pub use service::ConsoleService;
pub use state::{ConsoleState, NavigationGuard};
pub use store::{ConsoleStore, StateObserver};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving the console core
    pub use crate::{
        reduce, ConfigServer, ConsoleAction, ConsoleConfig, ConsoleError, ConsoleService,
        ConsoleState, ConsoleStore, StateObserver,
    };
    pub use cadm_promotion::{PromotionDiff, PromotionSession, PublishRequest};
    pub use cadm_tree::TreeNode;
    pub use cadm_version::{Version, VersionRef};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
