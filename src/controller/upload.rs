use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::forms::JobForm;
use crate::models::Job;
use crate::session::{Session, SessionStore};

/// Recent posts listed beside the upload form
pub const RECENT_POSTS_SHOWN: usize = 4;

/// Posting new jobs as the logged-in company
pub struct UploadController {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl UploadController {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    fn company_session(&self) -> Result<Session> {
        let session = self.session.require("post a job")?;
        if !session.is_company() {
            return Err(ClientError::Unauthorized("only company accounts can post jobs".to_string()));
        }
        Ok(session)
    }

    /// Validate and submit. Returns the server's confirmation message.
    pub async fn submit(&self, form: &JobForm) -> Result<String> {
        let session = self.company_session()?;
        let draft = form.validate()?;

        let response = self.api.upload_job(&session.token, &draft).await?;
        info!("Posted job '{}'", draft.job_title);
        Ok(response.message.unwrap_or_else(|| "Job Posted Successfully".to_string()))
    }

    pub async fn recent_posts(&self) -> Result<Vec<Job>> {
        let session = self.company_session()?;
        let company = self.api.company(session.id()).await?;
        let mut posts = company.populated_posts();
        posts.truncate(RECENT_POSTS_SHOWN);
        Ok(posts)
    }
}
