//! Config-server collaborator
//!
//! Transport is owned elsewhere; the core only depends on this trait.

use std::sync::Arc;

use async_trait::async_trait;
use cadm_promotion::{PromotionDiff, PublishRequest};
use cadm_tree::TreeNode;
use cadm_version::{Version, VersionRef};

/// Failures reported by the server collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Server unreachable or timed out
    #[error("server unavailable: {0}")]
    Unavailable(String),

    /// Requested resource does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Server refused the request
    #[error("rejected: {0}")]
    Rejected(String),
}

/// Operations the console needs from the configuration server
#[async_trait]
pub trait ConfigServer: Send + Sync {
    /// Full tree for a version (or latest)
    async fn fetch_tree(&self, version: &VersionRef) -> Result<Vec<TreeNode>, ClientError>;

    /// Versions, newest first
    async fn fetch_versions(&self) -> Result<Vec<Version>, ClientError>;

    /// Raw mappings text
    async fn fetch_mappings(&self) -> Result<String, ClientError>;

    /// Persist mappings text
    async fn save_mappings(&self, text: &str) -> Result<(), ClientError>;

    /// Changed paths and conflict flags for a staged/published pair
    async fn fetch_promotion_diff(
        &self,
        staged: &str,
        published: &str,
    ) -> Result<PromotionDiff, ClientError>;

    /// Publish every path in the request, or nothing
    async fn submit_publish(&self, request: &PublishRequest) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: ConfigServer + ?Sized> ConfigServer for Arc<T> {
    async fn fetch_tree(&self, version: &VersionRef) -> Result<Vec<TreeNode>, ClientError> {
        (**self).fetch_tree(version).await
    }

    async fn fetch_versions(&self) -> Result<Vec<Version>, ClientError> {
        (**self).fetch_versions().await
    }

    async fn fetch_mappings(&self) -> Result<String, ClientError> {
        (**self).fetch_mappings().await
    }

    async fn save_mappings(&self, text: &str) -> Result<(), ClientError> {
        (**self).save_mappings(text).await
    }

    async fn fetch_promotion_diff(
        &self,
        staged: &str,
        published: &str,
    ) -> Result<PromotionDiff, ClientError> {
        (**self).fetch_promotion_diff(staged, published).await
    }

    async fn submit_publish(&self, request: &PublishRequest) -> Result<(), ClientError> {
        (**self).submit_publish(request).await
    }
}
