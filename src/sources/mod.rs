pub mod companies;
pub mod jobs;
pub mod traits;
pub mod types;

pub use companies::CompanyDirectory;
pub use jobs::JobSearch;
pub use traits::ListSource;
pub use types::FetchResult;
