//! HTTP collaborators: the issue tracker search API and the dashboard
//! ingestion endpoint

pub mod dashboard;
pub mod handler;
pub mod tracker;

pub use dashboard::DashboardClient;
pub use handler::{ExportSink, IssueSource};
pub use tracker::TrackerClient;

fn http_error(e: reqwest::Error) -> nave_core::Error {
    nave_core::Error::Http(e.to_string())
}
