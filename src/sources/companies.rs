use async_trait::async_trait;
use tracing::info;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::Company;
use crate::query::QueryState;
use crate::sources::traits::ListSource;
use crate::sources::types::FetchResult;

/// Company directory backed by `GET /companies`.
/// Job-type and experience filters do not apply and are never sent.
#[derive(Debug, Clone)]
pub struct CompanyDirectory {
    api: ApiClient,
}

impl CompanyDirectory {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for CompanyDirectory {
    type Item = Company;

    async fn fetch_page(&self, query: &QueryState) -> Result<FetchResult<Company>> {
        let list = self.api.list_companies(&query.without_filters()).await?;
        info!("Found {} companies (page {} of {})", list.total, query.page(), list.num_of_page);
        Ok(FetchResult::new(list.data, list.total, list.num_of_page))
    }

    fn source_name(&self) -> &'static str {
        "companies"
    }
}
