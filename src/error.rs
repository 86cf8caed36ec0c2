use thiserror::Error;

use crate::forms::FormErrors;

/// Message shown when the failure carries nothing the user can act on
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}")]
    Http { status: reqwest::StatusCode },

    #[error("Unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    /// The server answered `{status: "failed", message}`
    #[error("{0}")]
    Application(String),

    /// Input rejected before anything was sent
    #[error("{0}")]
    Invalid(FormErrors),

    #[error("Not allowed: {0}")]
    Unauthorized(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Text suitable for showing next to the form or list that failed
    pub fn user_message(&self) -> String {
        match self {
            Self::Application(message) => message.clone(),
            Self::Unauthorized(reason) => reason.clone(),
            Self::Invalid(errors) => errors.to_string(),
            Self::Network(_) | Self::Http { .. } | Self::Decode { .. } => GENERIC_FAILURE.to_string(),
            Self::Storage(_) | Self::Config(_) => self.to_string(),
        }
    }

    /// Whether the request never produced a usable answer
    pub fn is_network_or_server(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Http { .. } | Self::Decode { .. })
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

impl From<FormErrors> for ClientError {
    fn from(e: FormErrors) -> Self {
        Self::Invalid(e)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
