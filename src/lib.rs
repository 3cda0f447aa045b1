// Client-side behaviour of the EPL site: fragment loading, page
// orchestration, navigation state and theme.

pub mod app;
pub mod config;
pub mod dashboard;
pub mod dom;
pub mod events;
pub mod fragments;
pub mod inscription;
pub mod navigation;
pub mod pages;
pub mod telemetry;
pub mod theme;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{BootstrapReport, ErrorReporter, Site, SiteBuilder};
pub use config::SiteConfig;

/// Configure from the environment and bootstrap the page at `path`.
pub async fn run(path: &str) -> anyhow::Result<BootstrapReport> {
    telemetry::init_tracing();
    let config = SiteConfig::from_env()?;
    let site = Site::builder(config).build()?;
    Ok(site.bootstrap_path(path).await)
}
