use async_trait::async_trait;
use tracing::info;

use crate::api::ApiClient;
use crate::error::Result;
use crate::models::Job;
use crate::query::QueryState;
use crate::sources::traits::ListSource;
use crate::sources::types::FetchResult;

/// Job search backed by `GET /jobs/find-jobs`
#[derive(Debug, Clone)]
pub struct JobSearch {
    api: ApiClient,
}

impl JobSearch {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ListSource for JobSearch {
    type Item = Job;

    async fn fetch_page(&self, query: &QueryState) -> Result<FetchResult<Job>> {
        let list = self.api.find_jobs(query).await?;
        info!(
            "Found {} jobs (page {} of {})",
            list.total_jobs,
            query.page(),
            list.num_of_page
        );
        Ok(FetchResult::new(list.data, list.total_jobs, list.num_of_page))
    }

    fn source_name(&self) -> &'static str {
        "jobs"
    }
}
