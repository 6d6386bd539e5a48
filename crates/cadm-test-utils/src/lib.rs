//! Testing utilities for the cadm workspace
//!
//! Shared fixtures and an in-memory config server.

#![allow(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cadm_core::{ClientError, ConfigServer, ConsoleConfig, ConsoleService};
use cadm_mappings::MappingEntry;
use cadm_promotion::{DiffEntry, PromotionDiff, PublishRequest};
use cadm_tree::TreeNode;
use cadm_version::{Version, VersionRef};
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

pub const SAMPLE_MAPPINGS: &str = "\
- sourceBranches:
  - main
  agentPattern: coder-.*
  targetFile: agents/coder.yaml
- sourceBranches: []
  agentPattern: .*
  targetFile: agents/default.yaml
";

/// `agents/{coder,reviewer}.yaml`, `handlers/notify.yaml`, `README.md`
pub fn create_sample_tree() -> Vec<TreeNode> {
    vec![
        TreeNode::directory(
            "agents",
            vec![TreeNode::file("coder.yaml"), TreeNode::file("reviewer.yaml")],
        ),
        TreeNode::directory("handlers", vec![TreeNode::file("notify.yaml")]),
        TreeNode::file("README.md"),
    ]
}

pub fn create_version(id: &str, day: u32) -> Version {
    Version::new(
        id,
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        format!("release {id}"),
    )
}

/// `v3`, `v2`, `v1`, newest first
pub fn create_sample_versions() -> Vec<Version> {
    vec![
        create_version("v3", 3),
        create_version("v2", 2),
        create_version("v1", 1),
    ]
}

pub fn create_diff(entries: &[(&str, bool)]) -> PromotionDiff {
    PromotionDiff::new(
        "v3",
        "v2",
        entries
            .iter()
            .map(|(path, conflict)| DiffEntry::new(*path, *conflict))
            .collect(),
    )
}

/// Two clean changes and one conflict
pub fn create_sample_diff() -> PromotionDiff {
    create_diff(&[
        ("agents/coder.yaml", false),
        ("agents/reviewer.yaml", true),
        ("handlers/notify.yaml", false),
    ])
}

pub fn create_sample_rules() -> Vec<MappingEntry> {
    vec![
        MappingEntry::new(vec!["main".to_string()], "coder-.*", "agents/coder.yaml"),
        MappingEntry::new(vec![], ".*", "agents/default.yaml"),
    ]
}

#[derive(Debug, Default)]
struct ServerData {
    tree: Vec<TreeNode>,
    version_trees: HashMap<String, Vec<TreeNode>>,
    versions: Vec<Version>,
    mappings: String,
    diff: Option<PromotionDiff>,
    fail_tree: bool,
    fail_versions: bool,
    reject_publish: bool,
    tree_requests: Vec<VersionRef>,
    saved_mappings: Vec<String>,
    published: Vec<PublishRequest>,
}

/// [`ConfigServer`] backed by memory, with failure switches and a call log
#[derive(Debug, Default)]
pub struct InMemoryServer {
    data: Mutex<ServerData>,
}

impl InMemoryServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample tree, versions, mappings and diff
    pub fn with_samples() -> Self {
        let server = Self::new();
        server.set_tree(create_sample_tree());
        server.set_versions(create_sample_versions());
        server.set_mappings(SAMPLE_MAPPINGS);
        server.set_diff(create_sample_diff());
        server
    }

    pub fn set_tree(&self, tree: Vec<TreeNode>) {
        self.data.lock().tree = tree;
    }

    /// Tree served for a pinned version; other ids get the latest tree
    pub fn set_version_tree(&self, id: &str, tree: Vec<TreeNode>) {
        self.data.lock().version_trees.insert(id.to_string(), tree);
    }

    pub fn set_versions(&self, versions: Vec<Version>) {
        self.data.lock().versions = versions;
    }

    pub fn set_mappings(&self, text: &str) {
        self.data.lock().mappings = text.to_string();
    }

    pub fn set_diff(&self, diff: PromotionDiff) {
        self.data.lock().diff = Some(diff);
    }

    pub fn fail_tree(&self, fail: bool) {
        self.data.lock().fail_tree = fail;
    }

    pub fn fail_versions(&self, fail: bool) {
        self.data.lock().fail_versions = fail;
    }

    pub fn reject_publish(&self, reject: bool) {
        self.data.lock().reject_publish = reject;
    }

    pub fn tree_requests(&self) -> Vec<VersionRef> {
        self.data.lock().tree_requests.clone()
    }

    pub fn saved_mappings(&self) -> Vec<String> {
        self.data.lock().saved_mappings.clone()
    }

    pub fn published(&self) -> Vec<PublishRequest> {
        self.data.lock().published.clone()
    }
}

#[async_trait]
impl ConfigServer for InMemoryServer {
    async fn fetch_tree(&self, version: &VersionRef) -> Result<Vec<TreeNode>, ClientError> {
        let mut data = self.data.lock();
        data.tree_requests.push(version.clone());
        if data.fail_tree {
            return Err(ClientError::Unavailable("tree".into()));
        }
        let tree = match version {
            VersionRef::Id(id) => data.version_trees.get(id).unwrap_or(&data.tree),
            VersionRef::Latest => &data.tree,
        };
        Ok(tree.clone())
    }

    async fn fetch_versions(&self) -> Result<Vec<Version>, ClientError> {
        let data = self.data.lock();
        if data.fail_versions {
            return Err(ClientError::Unavailable("versions".into()));
        }
        Ok(data.versions.clone())
    }

    async fn fetch_mappings(&self) -> Result<String, ClientError> {
        Ok(self.data.lock().mappings.clone())
    }

    async fn save_mappings(&self, text: &str) -> Result<(), ClientError> {
        let mut data = self.data.lock();
        data.mappings = text.to_string();
        data.saved_mappings.push(text.to_string());
        Ok(())
    }

    async fn fetch_promotion_diff(
        &self,
        staged: &str,
        published: &str,
    ) -> Result<PromotionDiff, ClientError> {
        let data = self.data.lock();
        data.diff
            .as_ref()
            .filter(|diff| diff.staged_version == staged && diff.published_version == published)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("diff {staged}..{published}")))
    }

    async fn submit_publish(&self, request: &PublishRequest) -> Result<(), ClientError> {
        let mut data = self.data.lock();
        if data.reject_publish {
            return Err(ClientError::Rejected("publish locked".into()));
        }
        data.published.push(request.clone());
        Ok(())
    }
}

/// Service over a shared sample server
pub fn setup_test_service(config: ConsoleConfig) -> (Arc<InMemoryServer>, ConsoleService<Arc<InMemoryServer>>) {
    let server = Arc::new(InMemoryServer::with_samples());
    let service = ConsoleService::new(Arc::clone(&server), config);
    (server, service)
}
