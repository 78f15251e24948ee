//! Provider contract invoked by a search host

use crate::results::ResultMeta;
use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure surfaced to the host
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The host's cancellable fired while the call was running
    #[error("operation was cancelled")]
    Cancelled,
}

/// Custom rendering for a result row
pub type RenderHandle = Box<dyn std::any::Any + Send + Sync>;

/// Contract between a search host and a result provider
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Unique id of the provider
    fn id(&self) -> &str;

    /// Desktop application backing the provider, if any
    fn app_info(&self) -> Option<String> {
        None
    }

    /// Whether the host may hand the whole search over to the provider
    fn can_launch_search(&self) -> bool {
        false
    }

    /// Hand the search over to the provider's application
    fn launch_search(&self, _terms: &[String]) {}

    /// Start a new search and return the ids of its results
    async fn get_initial_result_set(
        &self,
        terms: &[String],
        cancellable: &CancellationToken,
    ) -> Result<Vec<String>, ProviderError>;

    /// Refine the previous search with expanded terms
    async fn get_subsearch_result_set(
        &self,
        previous_results: &[String],
        terms: &[String],
        cancellable: &CancellationToken,
    ) -> Result<Vec<String>, ProviderError>;

    /// Metadata for each known id, in order
    async fn get_result_metas(
        &self,
        ids: &[String],
        cancellable: &CancellationToken,
    ) -> Result<Vec<ResultMeta>, ProviderError>;

    /// Keep the first `max_results` ids
    fn filter_results(&self, ids: &[String], max_results: usize) -> Vec<String> {
        ids.iter().take(max_results).cloned().collect()
    }

    /// Open a result. Unknown ids are ignored.
    fn activate_result(&self, id: &str, terms: &[String]);

    /// Custom row for a result; `None` lets the host use its default
    fn create_result_object(&self, _meta: &ResultMeta) -> Option<RenderHandle> {
        None
    }
}
