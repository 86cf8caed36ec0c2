use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::query::JobType;

/// Unknown job types decode as `None` instead of failing the whole record
fn lenient_job_type<'de, D: Deserializer<'de>>(d: D) -> Result<Option<JobType>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// A reference the API may or may not have populated: a bare id or the
/// whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Full(T),
}

impl<T> Ref<T> {
    pub fn full(&self) -> Option<&T> {
        match self {
            Ref::Full(record) => Some(record),
            Ref::Id(_) => None,
        }
    }
}

impl Ref<Company> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Full(company) => &company.id,
        }
    }
}

impl Ref<Job> {
    pub fn id(&self) -> &str {
        match self {
            Ref::Id(id) => id,
            Ref::Full(job) => &job.id,
        }
    }
}

/// Free-text block attached to a job posting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetailText {
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
}

/// Company as returned by the API. Only the id is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub job_posts: Vec<Ref<Job>>,
}

impl Company {
    /// Same company without its posts, for attaching to a job
    pub fn summary(&self) -> Company {
        Company {
            job_posts: Vec::new(),
            ..self.clone()
        }
    }

    pub fn post_count(&self) -> usize {
        self.job_posts.len()
    }

    /// Populated posts in server order. A post whose `company` is missing or
    /// only an id gets this company attached.
    pub fn populated_posts(&self) -> Vec<Job> {
        let summary = self.summary();
        self.job_posts
            .iter()
            .filter_map(Ref::full)
            .map(|job| {
                let mut job = job.clone();
                if !matches!(job.company, Some(Ref::Full(_))) {
                    job.company = Some(Ref::Full(summary.clone()));
                }
                job
            })
            .collect()
    }
}

/// Job posting. `company` is populated on list and detail endpoints and a
/// bare id inside a company's own `jobPosts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_job_type")]
    pub job_type: Option<JobType>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub vacancies: Option<u32>,
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub detail: Vec<JobDetailText>,
    #[serde(default)]
    pub company: Option<Ref<Company>>,
    #[serde(default)]
    pub application: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn title(&self) -> &str {
        self.job_title.as_deref().unwrap_or("Untitled")
    }

    pub fn company_name(&self) -> &str {
        self.company
            .as_ref()
            .and_then(Ref::full)
            .and_then(|c| c.name.as_deref())
            .unwrap_or("Unknown company")
    }

    pub fn company_id(&self) -> Option<&str> {
        self.company.as_ref().map(|c| c.id())
    }

    pub fn description(&self) -> Option<&str> {
        self.detail.first().and_then(|d| d.desc.as_deref())
    }

    pub fn requirements(&self) -> Option<&str> {
        self.detail.first().and_then(|d| d.requirements.as_deref())
    }

    pub fn applicant_count(&self) -> usize {
        self.application.len()
    }
}

/// Job seeker profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => "Unnamed".to_string(),
        }
    }
}

/// Account fields kept in the session. Seekers and companies share one
/// record; fields that do not apply to the account stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Seeker,
    Company,
}

impl Profile {
    /// Seeker accounts carry `accountType: "seeker"`; company records have none.
    pub fn kind(&self) -> AccountKind {
        match self.account_type.as_deref() {
            Some("seeker") => AccountKind::Seeker,
            _ => AccountKind::Company,
        }
    }

    pub fn display_name(&self) -> String {
        match self.kind() {
            AccountKind::Company => self.name.clone().unwrap_or_else(|| "Unnamed company".to_string()),
            AccountKind::Seeker => self.as_user().full_name(),
        }
    }

    pub fn as_user(&self) -> User {
        User {
            id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            contact: self.contact.clone(),
            location: self.location.clone(),
            job_title: self.job_title.clone(),
            about: self.about.clone(),
            profile_url: self.profile_url.clone(),
            account_type: self.account_type.clone(),
        }
    }
}
