use std::sync::Arc;

use tracing::info;

use crate::api::ApiClient;
use crate::error::Result;
use crate::forms::SignUpForm;
use crate::session::{Session, SessionStore};

/// Sign-up and login for seekers and companies
pub struct AuthController {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl AuthController {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Validate, hit the matching endpoint and install the new session
    pub async fn submit(&self, form: &SignUpForm) -> Result<Session> {
        let (route, credentials) = form.validate()?;
        let response = self.api.authenticate(route, &credentials).await?;

        let session = Session::from(response);
        self.session.login(session.clone())?;
        info!("Signed in as {} ({:?})", session.profile.display_name(), route);
        Ok(session)
    }

    pub fn logout(&self) {
        if let Some(session) = self.session.current() {
            info!("Signed out {}", session.profile.display_name());
        }
        self.session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::ClientError;

    #[tokio::test]
    async fn test_invalid_form_leaves_session_alone() {
        let store = Arc::new(SessionStore::in_memory());
        let auth = AuthController::new(ApiClient::new(&Config::default()).unwrap(), store.clone());

        let err = auth.submit(&SignUpForm::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Invalid(_)));
        assert!(store.current().is_none());
    }
}
