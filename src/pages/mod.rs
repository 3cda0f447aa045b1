//! Per-page orchestration: which fragments a page needs, loading them
//! together, and the statistics and notices that come out of it.

pub mod notice;
pub mod orchestrator;
pub mod profile;
pub mod stats;

pub use orchestrator::{PageOrchestrator, PageReport, PageSettings};
pub use profile::PageProfiles;
pub use stats::LoadStatistics;
