//! Subcommand bodies; each returns the text to print

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cadm_mappings::MappingsModel;
use cadm_promotion::{PromotionDiff, PromotionSession, ReviewBasis};
use cadm_tree::{resolve, validate_tree, NodeKind, TreeNode};
use cadm_version::{is_latest_selected, Version};
use serde::de::DeserializeOwned;
use serde_json::json;

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Kind of the node at `path`, or "not found"
pub(crate) fn resolve_node(tree_file: &Path, path: &str) -> Result<String> {
    let tree: Vec<TreeNode> = read_yaml(tree_file)?;
    validate_tree(&tree)?;
    tracing::debug!(path, nodes = tree.len(), "resolving");

    Ok(match resolve(&tree, path).map(TreeNode::kind) {
        Some(NodeKind::Directory) => format!("{path}: directory"),
        Some(NodeKind::File) => format!("{path}: file"),
        None => format!("{path}: not found"),
    })
}

pub(crate) fn versions(versions_file: &Path, selected: Option<&str>) -> Result<String> {
    let versions: Vec<Version> = read_yaml(versions_file)?;
    let latest = versions.first().map_or("none", |v| v.id.as_str());
    let mut out = format!("latest: {latest}\n");
    if let Some(id) = selected {
        if !versions.iter().any(|v| v.id == id) {
            tracing::warn!(id, "selected version is not in the list");
        }
        out.push_str(&format!("selected: {id}\n"));
    }
    out.push_str(&format!(
        "viewing latest: {}",
        is_latest_selected(&versions, selected)
    ));
    Ok(out)
}

/// Parse, compile every pattern and print the normalized text
pub(crate) fn check_mappings(file: &Path) -> Result<String> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let model = MappingsModel::parse(&text)
        .with_context(|| format!("{} is not valid mappings text", file.display()))?;
    model.validate()?;
    Ok(model.to_text()?)
}

#[derive(Debug, Default)]
pub(crate) struct ReviewArgs<'a> {
    pub(crate) approve: Vec<&'a str>,
    pub(crate) resolve: Vec<&'a str>,
    pub(crate) json: bool,
}

/// Replay approvals against a saved diff and report readiness
pub(crate) fn review(diff_file: &Path, args: &ReviewArgs<'_>) -> Result<String> {
    let diff: PromotionDiff = read_yaml(diff_file)?;
    // offline: the basis never changes between open and publish
    let basis = ReviewBasis::capture(0, &[]);
    let mut session = PromotionSession::new().open_review(diff, basis.clone())?;
    for path in &args.resolve {
        session = session.resolve_conflict(path);
    }
    for path in &args.approve {
        session = session.approve(path);
    }

    let outcome = session.publish(&basis);
    if args.json {
        let files: Vec<_> = session.files().collect();
        let report = json!({
            "stagedVersion": session.staged_version(),
            "publishedVersion": session.published_version(),
            "approved": session.approval_count(),
            "total": session.len(),
            "conflicts": session.conflicted_paths(),
            "files": files,
            "readyToPublish": outcome.is_ok(),
            "blockedBy": outcome.as_ref().err().map(ToString::to_string),
        });
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    let mut out = format!(
        "{} -> {}: {}\n",
        session.staged_version(),
        session.published_version(),
        session.progress()
    );
    for file in session.files() {
        let mark = match (file.has_conflict, file.approved) {
            (true, _) => "!",
            (false, true) => "x",
            (false, false) => " ",
        };
        out.push_str(&format!("[{mark}] {}\n", file.path));
    }
    match outcome {
        Ok((_, request)) => out.push_str(&format!("ready to publish {} paths", request.paths.len())),
        Err(err) => out.push_str(&format!("not ready: {err}")),
    }
    Ok(out)
}
