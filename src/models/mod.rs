pub mod application;
pub mod company;
pub mod favorite;
pub mod job;
pub mod user;

pub use application::Application;
pub use company::{Company, CompanyInput};
pub use favorite::Favorite;
pub use job::{Job, JobFilters, NewJob};
pub use user::{NewUser, User};

/// RFC 3339 timestamp used for every created_at/updated_at column.
pub fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}
