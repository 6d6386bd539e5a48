//! Error types for the console core
//!
//! Every variant is recoverable and local: the store keeps its previous
//! snapshot whenever a dispatch fails.

use cadm_mappings::MappingsError;
use cadm_promotion::PromotionError;
use cadm_tree::TreeError;

use crate::client::ClientError;
use crate::config::ConfigError;

/// Combined console error
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("mappings error: {0}")]
    Mappings(#[from] MappingsError),

    #[error("promotion error: {0}")]
    Promotion(#[from] PromotionError),

    #[error("server error: {0}")]
    Client(#[from] ClientError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ConsoleError {
    /// The review must be re-opened before anything else helps
    #[inline]
    #[must_use]
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::Promotion(e) if e.requires_refresh())
    }

    /// Retrying the same request may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Client(ClientError::Unavailable(_)))
    }
}

/// Result type alias for console operations
pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cadm_promotion::ReviewBasis;

    #[test]
    fn error_conversions() {
        let err: ConsoleError = PromotionError::NothingToPublish.into();
        assert!(matches!(err, ConsoleError::Promotion(_)));
        assert_eq!(err.to_string(), "promotion error: nothing to publish");
    }

    #[test]
    fn stale_review_requires_refresh() {
        let basis = ReviewBasis::capture(0, &[]);
        let err: ConsoleError = PromotionError::StaleReview {
            opened: basis.clone(),
            current: basis,
        }
        .into();
        assert!(err.requires_refresh());
        assert!(!err.is_retryable());
    }

    #[test]
    fn unavailable_server_is_retryable() {
        let err: ConsoleError = ClientError::Unavailable("timeout".into()).into();
        assert!(err.is_retryable());
        assert!(!err.requires_refresh());
    }
}
