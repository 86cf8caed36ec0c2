use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::error::{ClientError, Result};
use crate::forms::{CompanyForm, UserForm};
use crate::models::{AccountKind, Company, User};
use crate::session::{Session, SessionStore};

/// A company page and whether the viewer may edit it
#[derive(Debug, Clone)]
pub struct CompanyProfile {
    pub company: Company,
    pub editable: bool,
}

/// Edit rights: a company account looking at its own page
pub fn can_edit_company(session: Option<&Session>, company: &Company) -> bool {
    session.is_some_and(|s| s.is_company() && s.id() == company.id)
}

/// Company and seeker profile pages
pub struct ProfileController {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl ProfileController {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Load the company `id`, or the logged-in company when `id` is `None`.
    pub async fn company(&self, id: Option<&str>) -> Result<CompanyProfile> {
        let session = self.session.current();
        let id = match (id, session.as_ref()) {
            (Some(id), _) => id.to_string(),
            (None, Some(session)) => session.id().to_string(),
            (None, None) => return Err(ClientError::Unauthorized("log in to see your company page".to_string())),
        };

        let company = self.api.company(&id).await?;
        info!("Loaded company {} with {} job posts", company.id, company.post_count());
        let editable = can_edit_company(session.as_ref(), &company);
        Ok(CompanyProfile { company, editable })
    }

    /// Seeker profile of the current session
    pub fn user(&self) -> Result<User> {
        let session = self.session.require("see your profile")?;
        if session.kind() != AccountKind::Seeker {
            return Err(ClientError::Unauthorized("company accounts have no seeker profile".to_string()));
        }
        Ok(session.profile.as_user())
    }

    pub async fn update_company(&self, form: &CompanyForm) -> Result<Session> {
        let session = self.session.require("edit a company profile")?;
        if !session.is_company() {
            return Err(ClientError::Unauthorized("only company accounts can edit a company".to_string()));
        }
        let payload = form.validate()?;

        let response = self.api.update_company(&session.token, &payload).await?;
        let updated = Session::from(response);
        self.session.login(updated.clone())?;
        info!("Updated company profile {}", updated.id());
        Ok(updated)
    }

    pub async fn update_user(&self, form: &UserForm) -> Result<Session> {
        let session = self.session.require("edit your profile")?;
        if session.kind() != AccountKind::Seeker {
            return Err(ClientError::Unauthorized("only seeker accounts can edit a seeker profile".to_string()));
        }
        let payload = form.validate()?;

        let response = self.api.update_user(&session.token, &payload).await?;
        let updated = Session::from(response);
        self.session.login(updated.clone())?;
        info!("Updated user profile {}", updated.id());
        Ok(updated)
    }
}
