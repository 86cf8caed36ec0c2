pub mod auth;
pub mod detail;
pub mod list;
pub mod profile;
pub mod upload;

pub use auth::AuthController;
pub use detail::{JobDetail, JobDetailController, Tab};
pub use list::{FetchMode, Intent, ListController, Outcome, Phase};
pub use profile::{CompanyProfile, ProfileController};
pub use upload::UploadController;
