use async_trait::async_trait;

use crate::error::Result;
use crate::query::QueryState;
use crate::sources::types::FetchResult;

/// Common trait for paginated remote lists.
/// The list controller only talks to this, so tests can stand in their own.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    /// Fetch the page named by `query.page()`
    async fn fetch_page(&self, query: &QueryState) -> Result<FetchResult<Self::Item>>;

    /// Name used in logs
    fn source_name(&self) -> &'static str;
}
