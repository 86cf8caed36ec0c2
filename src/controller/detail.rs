use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::models::Job;
use crate::session::{Session, SessionStore};

/// Similar jobs shown next to a posting
pub const SIMILAR_JOBS_SHOWN: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Description,
    Company,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Description => f.write_str("Job Description"),
            Tab::Company => f.write_str("Company"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "description" | "job" | "0" => Ok(Tab::Description),
            "company" | "1" => Ok(Tab::Company),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

/// A loaded job posting with its tab selection
#[derive(Debug, Clone)]
pub struct JobDetail {
    pub job: Job,
    similar: Vec<Job>,
    tab: Tab,
}

impl JobDetail {
    pub fn new(job: Job, similar: Vec<Job>) -> Self {
        Self {
            job,
            similar,
            tab: Tab::default(),
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn similar(&self) -> &[Job] {
        &self.similar[..self.similar.len().min(SIMILAR_JOBS_SHOWN)]
    }

    /// The posting belongs to the logged-in company
    pub fn owned_by(&self, session: Option<&Session>) -> bool {
        match (session, self.job.company_id()) {
            (Some(session), Some(company)) => session.id() == company,
            _ => false,
        }
    }
}

/// Loads postings and performs the owner-only delete
pub struct JobDetailController {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl JobDetailController {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn open(&self, id: &str) -> Result<JobDetail> {
        let response = self.api.job_detail(id).await?;
        info!("Loaded job {} with {} similar", response.data.id, response.similar_jobs.len());
        Ok(JobDetail::new(response.data, response.similar_jobs))
    }

    pub fn can_delete(&self, detail: &JobDetail) -> bool {
        detail.owned_by(self.session.current().as_ref())
    }

    /// Delete the posting. Returns the server's confirmation message.
    pub async fn delete(&self, detail: &JobDetail) -> Result<String> {
        let session = self.session.require("delete a job")?;
        if !detail.owned_by(Some(&session)) {
            return Err(ClientError::Unauthorized(
                "only the company that posted this job can delete it".to_string(),
            ));
        }

        let response = self.api.delete_job(&session.token, &detail.job.id).await?;
        if !response.success {
            return Err(ClientError::Application(
                response.message.unwrap_or_else(|| "Job was not deleted".to_string()),
            ));
        }
        info!("Deleted job {}", detail.job.id);
        Ok(response.message.unwrap_or_else(|| "Job Post Deleted Successfully".to_string()))
    }
}
