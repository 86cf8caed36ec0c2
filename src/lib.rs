//! Client for the JobFinder job-board API: query state for list views, a
//! paginated list controller, detail/profile views, form validation and a
//! persisted session.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod forms;
pub mod models;
pub mod query;
pub mod session;
pub mod sources;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ClientError, Result};
pub use session::{Session, SessionStore};
