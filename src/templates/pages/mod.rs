pub mod dashboard;
pub mod error;
pub mod home;

pub use dashboard::{dashboard_page, DashboardVm};
pub use error::error_page;
pub use home::home_page;
