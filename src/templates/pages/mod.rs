pub mod dashboard;
pub mod snapshots;

pub use dashboard::{dashboard_page, Baseline, DashboardVm};
pub use snapshots::snapshots_page;
