pub mod envelope;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::models::Company;
use crate::query::QueryState;

pub use envelope::{AuthResponse, CompanyList, CompanyResponse, JobDetailResponse, JobList, MutationResponse};

/// Which account endpoint to hit on sign-up / login
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRoute {
    RegisterSeeker,
    LoginSeeker,
    RegisterCompany,
    LoginCompany,
}

impl AuthRoute {
    pub fn new(register: bool, company: bool) -> Self {
        match (register, company) {
            (true, false) => Self::RegisterSeeker,
            (false, false) => Self::LoginSeeker,
            (true, true) => Self::RegisterCompany,
            (false, true) => Self::LoginCompany,
        }
    }

    pub fn segments(&self) -> [&'static str; 2] {
        match self {
            Self::RegisterSeeker => ["auth", "register"],
            Self::LoginSeeker => ["auth", "login"],
            Self::RegisterCompany => ["companies", "register"],
            Self::LoginCompany => ["companies", "login"],
        }
    }
}

/// Thin REST wrapper over the JobFinder API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.api_url).map_err(|e| ClientError::Config(e.to_string()))?;
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("jobfinder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build `<base>/<segments...>?<query>`, escaping each segment.
    pub fn endpoint(&self, segments: &[&str], query: Option<&str>) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("API url '{}' cannot have a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    async fn request<T, B>(&self, method: Method, url: Url, token: Option<&str>, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = url.path().to_string();
        debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ClientError::Network(e)
        })?;
        let status = response.status();
        let text = response.text().await?;
        debug!("{} {} -> {} ({} bytes)", method, path, status, text.len());

        envelope::decode(&path, status, &text).map_err(|e| {
            if e.is_network_or_server() {
                warn!("{} {}: {}", method, path, e);
            }
            e
        })
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        self.request::<T, ()>(Method::GET, url, None, None).await
    }

    pub async fn find_jobs(&self, query: &QueryState) -> Result<JobList> {
        let url = self.endpoint(&["jobs", "find-jobs"], Some(&query.serialize()))?;
        self.get(url).await
    }

    pub async fn list_companies(&self, query: &QueryState) -> Result<CompanyList> {
        let url = self.endpoint(&["companies"], Some(&query.serialize()))?;
        self.get(url).await
    }

    pub async fn job_detail(&self, id: &str) -> Result<JobDetailResponse> {
        let url = self.endpoint(&["jobs", "get-job-detail", id], None)?;
        self.get(url).await
    }

    pub async fn company(&self, id: &str) -> Result<Company> {
        let url = self.endpoint(&["companies", "get-company", id], None)?;
        let response: CompanyResponse = self.get(url).await?;
        Ok(response.data)
    }

    pub async fn upload_job<B: Serialize + ?Sized>(&self, token: &str, job: &B) -> Result<MutationResponse> {
        let url = self.endpoint(&["jobs", "upload-job"], None)?;
        self.request(Method::POST, url, Some(token), Some(job)).await
    }

    pub async fn delete_job(&self, token: &str, id: &str) -> Result<MutationResponse> {
        let url = self.endpoint(&["jobs", "delete-job", id], None)?;
        self.request::<_, ()>(Method::DELETE, url, Some(token), None).await
    }

    pub async fn update_user<B: Serialize + ?Sized>(&self, token: &str, user: &B) -> Result<AuthResponse> {
        let url = self.endpoint(&["users", "update-user"], None)?;
        self.request(Method::PUT, url, Some(token), Some(user)).await
    }

    pub async fn update_company<B: Serialize + ?Sized>(&self, token: &str, company: &B) -> Result<AuthResponse> {
        let url = self.endpoint(&["companies", "update-company"], None)?;
        self.request(Method::PUT, url, Some(token), Some(company)).await
    }

    pub async fn authenticate<B: Serialize + ?Sized>(&self, route: AuthRoute, credentials: &B) -> Result<AuthResponse> {
        let url = self.endpoint(&route.segments(), None)?;
        self.request(Method::POST, url, None, Some(credentials)).await
    }
}
