//! Response shapes of the JobFinder API and the decode step that turns a raw
//! body into one of them or a typed failure.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClientError, Result, GENERIC_FAILURE};
use crate::models::{Company, Job, Profile};

/// `GET /jobs/find-jobs`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobList {
    pub data: Vec<Job>,
    #[serde(default)]
    pub total_jobs: u64,
    #[serde(default)]
    pub num_of_page: u32,
}

/// `GET /companies`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyList {
    pub data: Vec<Company>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub num_of_page: u32,
}

/// `GET /jobs/get-job-detail/:id`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailResponse {
    pub data: Job,
    #[serde(default)]
    pub similar_jobs: Vec<Job>,
}

/// `GET /companies/get-company/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyResponse {
    pub data: Company,
}

/// Login, register and profile updates all answer with a fresh token and
/// the account record.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Profile,
    #[serde(default)]
    pub message: Option<String>,
}

/// Create and delete endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Decode a response body from `endpoint`.
///
/// `{status: "failed"}` bodies become [`ClientError::Application`] whatever the
/// HTTP status. Any other non-success status becomes `Application` when it
/// carries a message and [`ClientError::Http`] when it does not.
pub fn decode<T: DeserializeOwned>(endpoint: &str, status: StatusCode, body: &str) -> Result<T> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            return Err(ClientError::Decode {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => return Err(ClientError::Http { status }),
    };

    if let Some(failure) = application_failure(&value) {
        return Err(failure);
    }
    if !status.is_success() {
        return match message_of(&value) {
            Some(message) => Err(ClientError::Application(message)),
            None => Err(ClientError::Http { status }),
        };
    }

    serde_json::from_value(value).map_err(|e| ClientError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

fn application_failure(value: &Value) -> Option<ClientError> {
    if value.get("status").and_then(Value::as_str) != Some("failed") {
        return None;
    }
    let message = message_of(value).unwrap_or_else(|| GENERIC_FAILURE.to_string());
    Some(ClientError::Application(message))
}

fn message_of(value: &Value) -> Option<String> {
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_job_list() {
        let body = r#"{"success":true,"totalJobs":2,"numOfPage":1,"page":1,
            "data":[{"_id":"j1","jobTitle":"A"},{"_id":"j2","jobTitle":"B"}]}"#;
        let list: JobList = decode("/jobs/find-jobs", StatusCode::OK, body).unwrap();
        assert_eq!(list.data.len(), 2);
        assert_eq!(list.total_jobs, 2);
        assert_eq!(list.num_of_page, 1);
    }

    #[test]
    fn test_company_list_with_post_ids() {
        let body = r#"{"success":true,"total":1,"numOfPage":1,
            "data":[{"_id":"c1","name":"Acme","jobPosts":["j1","j2"]}]}"#;
        let list: CompanyList = decode("/companies", StatusCode::OK, body).unwrap();
        assert_eq!(list.data[0].post_count(), 2);
        assert_eq!(list.total, 1);
    }

    #[test]
    fn test_company_page_with_unpopulated_post_company() {
        let body = r#"{"success":true,"data":{"_id":"c1","name":"Acme",
            "jobPosts":[{"_id":"j1","jobTitle":"Rust Developer","company":"c1"}]}}"#;
        let page: CompanyResponse = decode("/companies/get-company/c1", StatusCode::OK, body).unwrap();
        let posts = page.data.populated_posts();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].company_id(), Some("c1"));
        assert_eq!(posts[0].company_name(), "Acme");
    }

    #[test]
    fn test_failed_status_is_application_failure() {
        let body = r#"{"status":"failed","message":"Invalid email or password"}"#;
        let err = decode::<AuthResponse>("/auth/login", StatusCode::OK, body).unwrap_err();
        assert!(matches!(err, ClientError::Application(ref m) if m == "Invalid email or password"));

        let err = decode::<AuthResponse>("/auth/login", StatusCode::NOT_FOUND, body).unwrap_err();
        assert!(matches!(err, ClientError::Application(_)));
    }

    #[test]
    fn test_failed_without_message_uses_generic_text() {
        let err = decode::<MutationResponse>("/jobs/upload-job", StatusCode::OK, r#"{"status":"failed"}"#)
            .unwrap_err();
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn test_error_status_without_payload() {
        let err = decode::<JobList>("/jobs/find-jobs", StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>")
            .unwrap_err();
        assert!(matches!(err, ClientError::Http { status } if status == StatusCode::INTERNAL_SERVER_ERROR));

        let err = decode::<JobList>("/jobs/find-jobs", StatusCode::BAD_GATEWAY, "{}").unwrap_err();
        assert!(matches!(err, ClientError::Http { .. }));
    }

    #[test]
    fn test_error_status_with_message() {
        let err = decode::<MutationResponse>(
            "/jobs/delete-job/1",
            StatusCode::UNAUTHORIZED,
            r#"{"success":false,"message":"Authentication failed"}"#,
        )
        .unwrap_err();
        assert_eq!(err.user_message(), "Authentication failed");
    }

    #[test]
    fn test_wrong_shape_is_decode_error() {
        let err = decode::<JobList>("/jobs/find-jobs", StatusCode::OK, r#"{"data":"nope"}"#).unwrap_err();
        assert!(matches!(err, ClientError::Decode { ref endpoint, .. } if endpoint == "/jobs/find-jobs"));

        let err = decode::<JobList>("/jobs/find-jobs", StatusCode::OK, "not json").unwrap_err();
        assert!(err.is_network_or_server());
    }
}
