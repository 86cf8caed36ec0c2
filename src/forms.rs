//! Validation for the forms that create or change data on the server.
//!
//! Each form is a plain struct of raw user input. `validate` either returns
//! the typed payload sent to the API or every field error at once, keyed by
//! the API field name.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::api::AuthRoute;
use crate::query::JobType;

/// Field name to message, in field-name order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, String>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    fn require(&mut self, field: &'static str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    fn number<T: std::str::FromStr>(&mut self, field: &'static str, value: &str, required: &str, label: &str) -> Option<T> {
        if value.trim().is_empty() {
            self.add(field, required);
            return None;
        }
        match value.trim().parse() {
            Ok(n) => Some(n),
            Err(_) => {
                self.add(field, format!("{} must be a number", label));
                None
            }
        }
    }

    fn finish<T>(self, payload: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(payload())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

fn trimmed(s: &str) -> String {
    s.trim().to_string()
}

fn optional(s: &str) -> Option<String> {
    Some(s.trim()).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Job posting form
#[derive(Debug, Clone)]
pub struct JobForm {
    pub job_title: String,
    pub job_type: JobType,
    pub salary: String,
    pub vacancies: String,
    pub experience: String,
    pub location: String,
    pub desc: String,
    pub requirements: String,
}

impl Default for JobForm {
    fn default() -> Self {
        Self {
            job_title: String::new(),
            job_type: JobType::FullTime,
            salary: String::new(),
            vacancies: String::new(),
            experience: String::new(),
            location: String::new(),
            desc: String::new(),
            requirements: String::new(),
        }
    }
}

/// Body of `POST /jobs/upload-job`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub job_title: String,
    pub job_type: JobType,
    pub salary: f64,
    pub vacancies: u32,
    pub experience: u32,
    pub location: String,
    pub desc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
}

impl JobForm {
    pub fn validate(&self) -> Result<JobDraft, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("jobTitle", &self.job_title, "Job Title is required");
        let salary: Option<f64> = errors.number("salary", &self.salary, "Salary is required", "Salary");
        let vacancies: Option<u32> = errors.number("vacancies", &self.vacancies, "Vacancies is required", "Vacancies");
        let experience: Option<u32> =
            errors.number("experience", &self.experience, "Experience is required", "Experience");
        errors.require("location", &self.location, "Job Location is required");
        errors.require("desc", &self.desc, "Job Description is required!");
        if salary.is_some_and(|s| s < 0.0) {
            errors.add("salary", "Salary cannot be negative");
        }

        errors.finish(|| JobDraft {
            job_title: trimmed(&self.job_title),
            job_type: self.job_type,
            salary: salary.unwrap_or_default(),
            vacancies: vacancies.unwrap_or_default(),
            experience: experience.unwrap_or_default(),
            location: trimmed(&self.location),
            desc: trimmed(&self.desc),
            requirements: optional(&self.requirements),
        })
    }
}

/// Seeker profile form, body of `PUT /users/update-user`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    pub contact: String,
    pub location: String,
    pub job_title: String,
    pub about: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl UserForm {
    pub fn validate(&self) -> Result<UserForm, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("firstName", &self.first_name, "First Name is required");
        errors.require("lastName", &self.last_name, "Last Name is required");
        errors.require("contact", &self.contact, "Contact is required");
        errors.require("location", &self.location, "Location is required");
        errors.require("jobTitle", &self.job_title, "Job Title is required");
        errors.require("about", &self.about, "Write a little bit about yourself and your projects");

        errors.finish(|| UserForm {
            first_name: trimmed(&self.first_name),
            last_name: trimmed(&self.last_name),
            contact: trimmed(&self.contact),
            location: trimmed(&self.location),
            job_title: trimmed(&self.job_title),
            about: trimmed(&self.about),
            profile_url: self.profile_url.as_deref().and_then(optional),
        })
    }
}

/// Company profile form, body of `PUT /companies/update-company`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForm {
    pub name: String,
    pub location: String,
    pub contact: String,
    pub about: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl CompanyForm {
    pub fn validate(&self) -> Result<CompanyForm, FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("name", &self.name, "Company Name is required");
        errors.require("location", &self.location, "Location is required");
        errors.require("contact", &self.contact, "Contact number is required");
        errors.require("about", &self.about, "About section is required");

        errors.finish(|| CompanyForm {
            name: trimmed(&self.name),
            location: trimmed(&self.location),
            contact: trimmed(&self.contact),
            about: trimmed(&self.about),
            profile_url: self.profile_url.as_deref().and_then(optional),
        })
    }
}

/// Combined sign-up / login form for both account kinds
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub register: bool,
    pub company: bool,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    /// Company name, used when registering a company
    pub name: String,
}

/// Body of the four auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl SignUpForm {
    pub fn route(&self) -> AuthRoute {
        AuthRoute::new(self.register, self.company)
    }

    pub fn validate(&self) -> Result<(AuthRoute, Credentials), FormErrors> {
        let mut errors = FormErrors::default();
        errors.require("email", &self.email, "Email is required");
        errors.require("password", &self.password, "Password is required");

        if self.register {
            if self.company {
                errors.require("name", &self.name, "Company Name is required");
            } else {
                errors.require("firstName", &self.first_name, "First Name is required");
                errors.require("lastName", &self.last_name, "Last Name is required");
            }
            if self.confirm_password != self.password {
                errors.add("cPassword", "Passwords do not match");
            }
        }

        let seeker_register = self.register && !self.company;
        let company_register = self.register && self.company;
        errors.finish(|| {
            (
                self.route(),
                Credentials {
                    email: trimmed(&self.email),
                    password: self.password.clone(),
                    first_name: Some(trimmed(&self.first_name)).filter(|_| seeker_register),
                    last_name: Some(trimmed(&self.last_name)).filter(|_| seeker_register),
                    name: Some(trimmed(&self.name)).filter(|_| company_register),
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn job_form() -> JobForm {
        JobForm {
            job_title: " Backend Engineer ".into(),
            salary: "1500".into(),
            vacancies: "3".into(),
            experience: "2".into(),
            location: "New York".into(),
            desc: "Build APIs".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_job_form_valid() {
        let draft = job_form().validate().unwrap();
        assert_eq!(draft.job_title, "Backend Engineer");
        assert_eq!(draft.job_type, JobType::FullTime);
        assert_eq!(draft.vacancies, 3);
        assert_eq!(draft.requirements, None);

        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(body["jobTitle"], "Backend Engineer");
        assert_eq!(body["jobType"], "Full-Time");
        assert!(body.get("requirements").is_none());
    }

    #[test]
    fn test_job_form_reports_every_error() {
        let form = JobForm {
            salary: "lots".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("jobTitle"), Some("Job Title is required"));
        assert_eq!(errors.get("salary"), Some("Salary must be a number"));
        assert_eq!(errors.get("vacancies"), Some("Vacancies is required"));
        assert_eq!(errors.get("experience"), Some("Experience is required"));
        assert_eq!(errors.get("location"), Some("Job Location is required"));
        assert_eq!(errors.get("desc"), Some("Job Description is required!"));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_negative_salary() {
        let form = JobForm {
            salary: "-5".into(),
            ..job_form()
        };
        assert_eq!(form.validate().unwrap_err().get("salary"), Some("Salary cannot be negative"));
    }

    #[test]
    fn test_company_form() {
        let errors = CompanyForm::default().validate().unwrap_err();
        assert_eq!(errors.get("contact"), Some("Contact number is required"));
        assert_eq!(errors.len(), 4);

        let form = CompanyForm {
            name: "Acme".into(),
            location: "California".into(),
            contact: "555".into(),
            about: "Widgets".into(),
            profile_url: Some("  ".into()),
        };
        assert_eq!(form.validate().unwrap().profile_url, None);
    }

    #[test]
    fn test_user_form_whitespace_is_missing() {
        let form = UserForm {
            first_name: "   ".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("firstName"), Some("First Name is required"));
        assert_eq!(errors.len(), 6);
    }

    #[test]
    fn test_seeker_registration() {
        let form = SignUpForm {
            register: true,
            email: "ada@example.com".into(),
            password: "secret".into(),
            confirm_password: "secret".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            name: "ignored".into(),
            ..Default::default()
        };
        let (route, creds) = form.validate().unwrap();
        assert_eq!(route, AuthRoute::RegisterSeeker);
        assert_eq!(creds.first_name.as_deref(), Some("Ada"));
        assert_eq!(creds.name, None);
    }

    #[test]
    fn test_password_mismatch() {
        let form = SignUpForm {
            register: true,
            company: true,
            email: "hr@acme.com".into(),
            password: "a".into(),
            confirm_password: "b".into(),
            name: "Acme".into(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("cPassword"), Some("Passwords do not match"));
        assert_eq!(errors.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_login_needs_only_credentials() {
        let form = SignUpForm {
            company: true,
            email: "hr@acme.com".into(),
            password: "pw".into(),
            ..Default::default()
        };
        let (route, creds) = form.validate().unwrap();
        assert_eq!(route, AuthRoute::LoginCompany);
        let body = serde_json::to_value(&creds).unwrap();
        assert_eq!(body, serde_json::json!({ "email": "hr@acme.com", "password": "pw" }));
    }
}
