use crate::domain::errors::FetchError;
use async_trait::async_trait;

/// One way of turning a URL into a response body.
///
/// Implementations are chained: the first strategy that succeeds wins.
#[async_trait]
pub trait TextRetriever: Send + Sync {
    /// Short name used in logs and metrics labels
    fn name(&self) -> &'static str;

    async fn retrieve(&self, url: &str) -> Result<String, FetchError>;
}
