//! Async console flows against a [`ConfigServer`]

use std::sync::Arc;

use cadm_mappings::MappingsModel;
use cadm_promotion::{PromotionError, PublishRequest};
use tracing::{info, instrument, warn};

use crate::action::ConsoleAction;
use crate::client::ConfigServer;
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, ConsoleResult};
use crate::state::ConsoleState;
use crate::store::ConsoleStore;

/// Fetches from the server and feeds the results through the store
#[derive(Debug)]
pub struct ConsoleService<S> {
    server: S,
    store: Arc<ConsoleStore>,
    config: ConsoleConfig,
}

impl<S: ConfigServer> ConsoleService<S> {
    #[must_use]
    pub fn new(server: S, config: ConsoleConfig) -> Self {
        let store = Arc::new(ConsoleStore::new(ConsoleState::new(&config)));
        Self::with_store(server, store, config)
    }

    /// Share an existing store (e.g. one the UI already observes)
    #[must_use]
    pub fn with_store(server: S, store: Arc<ConsoleStore>, config: ConsoleConfig) -> Self {
        Self {
            server,
            store,
            config,
        }
    }

    #[inline]
    #[must_use]
    pub fn store(&self) -> &Arc<ConsoleStore> {
        &self.store
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> Arc<ConsoleState> {
        self.store.state()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn server(&self) -> &S {
        &self.server
    }

    /// Dispatch a local action
    ///
    /// # Errors
    ///
    /// Propagates the reducer error.
    pub fn dispatch(&self, action: ConsoleAction) -> ConsoleResult<Arc<ConsoleState>> {
        self.store.dispatch(action)
    }

    /// Reload versions, then the tree for the effective version
    ///
    /// # Errors
    ///
    /// Fails only when the version list cannot be fetched.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> ConsoleResult<Arc<ConsoleState>> {
        let versions = self.server.fetch_versions().await?;
        self.store.dispatch(ConsoleAction::VersionsLoaded(versions))?;
        self.reload_tree().await
    }

    /// Reload the tree; any failure shows an empty root
    ///
    /// # Errors
    ///
    /// Only if installing the empty tree itself fails.
    pub async fn reload_tree(&self) -> ConsoleResult<Arc<ConsoleState>> {
        let version = self.store.state().versions().version_ref();
        let tree = match self.server.fetch_tree(&version).await {
            Ok(tree) => tree,
            Err(err) => {
                warn!(%version, error = %err, "tree unavailable; showing empty root");
                Vec::new()
            }
        };

        match self.store.dispatch(ConsoleAction::TreeLoaded(tree)) {
            Err(ConsoleError::Tree(err)) => {
                warn!(%version, error = %err, "server tree rejected; showing empty root");
                self.store.dispatch(ConsoleAction::TreeLoaded(Vec::new()))
            }
            other => other,
        }
    }

    /// Pin a version (or follow latest) and load its tree
    ///
    /// # Errors
    ///
    /// See [`reload_tree`](Self::reload_tree).
    pub async fn select_version(&self, id: Option<String>) -> ConsoleResult<Arc<ConsoleState>> {
        self.store.dispatch(ConsoleAction::SelectVersion(id))?;
        self.reload_tree().await
    }

    /// Fetch and parse the mappings document
    ///
    /// # Errors
    ///
    /// Server failure, or a parse error with its text location.
    pub async fn load_mappings(&self) -> ConsoleResult<Arc<ConsoleState>> {
        let text = self.server.fetch_mappings().await?;
        let mappings = MappingsModel::parse(&text)?;
        self.store.dispatch(ConsoleAction::MappingsLoaded(mappings))
    }

    /// Save the mappings draft (or the current rules when there is none)
    ///
    /// The draft must parse and every pattern must compile. The text sent is
    /// the normalized serialization, and the draft is cleared only once the
    /// server has accepted it.
    ///
    /// # Errors
    ///
    /// Parse or pattern errors leave the draft in place, as do server errors.
    pub async fn save_mappings(&self) -> ConsoleResult<Arc<ConsoleState>> {
        let state = self.store.state();
        let mappings = match state.mappings_draft() {
            Some(draft) => MappingsModel::parse(draft)?,
            None => state.mappings().clone(),
        };
        mappings.validate()?;

        let text = mappings.to_text()?;
        self.server.save_mappings(&text).await?;
        info!(rules = mappings.len(), "mappings saved to server");
        self.store.dispatch(ConsoleAction::MappingsSaved(mappings))
    }

    /// Fetch the diff for a staged/published pair and open a review on it
    ///
    /// # Errors
    ///
    /// Server failure, or a publish is in flight.
    pub async fn open_review(
        &self,
        staged: &str,
        published: &str,
    ) -> ConsoleResult<Arc<ConsoleState>> {
        let diff = self.server.fetch_promotion_diff(staged, published).await?;
        info!(staged, published, files = diff.entries.len(), "opening promotion review");
        self.store.dispatch(ConsoleAction::OpenReview(diff))
    }

    /// Publish the open review as one request
    ///
    /// Nothing is sent unless the session accepts: no conflicts, every file
    /// approved, and the review still matches the current snapshot.
    ///
    /// Once the server accepts, the publish has happened: a failed reload
    /// afterwards is logged and does not turn the result into an error.
    ///
    /// # Errors
    ///
    /// The session's refusal, or the server's; on a server refusal the review
    /// is dropped and must be reopened.
    #[instrument(skip(self))]
    pub async fn publish(&self) -> ConsoleResult<PublishRequest> {
        let state = self.store.dispatch(ConsoleAction::RequestPublish)?;
        let request = state
            .pending_publish()
            .cloned()
            .ok_or(PromotionError::NoActiveReview)?;

        if let Err(err) = self.server.submit_publish(&request).await {
            warn!(error = %err, paths = request.paths.len(), "publish refused by server");
            self.store.dispatch(ConsoleAction::PublishFailed)?;
            return Err(err.into());
        }

        info!(
            staged = %request.staged_version,
            paths = request.paths.len(),
            "published"
        );
        self.store.dispatch(ConsoleAction::PublishCompleted)?;
        if self.config.reload_after_publish {
            if let Err(err) = self.refresh().await {
                warn!(error = %err, "published, but reloading afterwards failed");
            }
        }
        Ok(request)
    }
}
