//! Site service context: wires the document, loader, page orchestrator,
//! navigation sync and theme manager together and bootstraps a page.

use crate::config::SiteConfig;
use crate::dashboard::{DashboardData, DashboardSummary, FixtureError};
use crate::dom::{self, Document, SharedDocument};
use crate::events::{AppEvent, EventBus};
use crate::fragments::{FragmentLoader, FragmentSource, HttpSource, LoadOptions};
use crate::navigation::route::last_segment;
use crate::navigation::{NavigationSync, Route, SyncReport};
use crate::pages::{PageOrchestrator, PageReport};
use crate::theme::{FileStore, MemoryStore, PreferenceStore, SystemPreferences, Theme, ThemeManager};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// Announced in the status region when bootstrap hits an error.
pub const BOOTSTRAP_ERROR_MESSAGE: &str = "Une erreur est survenue. Veuillez recharger la page.";

/// Hook for forwarding bootstrap errors to an external tracker.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &anyhow::Error);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootstrapReport {
    pub page: String,
    pub theme: Option<Theme>,
    pub pages: Option<PageReport>,
    pub navigation: Option<SyncReport>,
    pub errors: Vec<String>,
}

impl BootstrapReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct SiteBuilder {
    config: SiteConfig,
    source: Option<Arc<dyn FragmentSource>>,
    store: Option<Arc<dyn PreferenceStore>>,
    system: SystemPreferences,
    document: Option<Document>,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

impl SiteBuilder {
    pub fn new(config: SiteConfig) -> Self {
        Self {
            config,
            source: None,
            store: None,
            system: SystemPreferences::default(),
            document: None,
            reporter: None,
        }
    }

    /// Defaults to an `HttpSource` on the configured base URL.
    pub fn source(mut self, source: Arc<dyn FragmentSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Defaults to the configured file store, or memory.
    pub fn store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn system_preferences(mut self, system: SystemPreferences) -> Self {
        self.system = system;
        self
    }

    /// Defaults to the standard shell at `/`.
    pub fn document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Result<Site> {
        self.config.validate().context("invalid site configuration")?;
        let bus = EventBus::new();

        let document = self
            .document
            .unwrap_or_else(|| Document::standard_shell("/"))
            .with_observer(bus.clone());
        let document = dom::shared(document);

        let source: Arc<dyn FragmentSource> = match self.source {
            Some(source) => source,
            None => Arc::new(
                HttpSource::new(self.config.base_url()?, self.config.request_timeout())
                    .context("could not build HTTP fragment source")?,
            ),
        };

        let store: Arc<dyn PreferenceStore> = match (self.store, &self.config.theme.store_path) {
            (Some(store), _) => store,
            (None, Some(path)) => Arc::new(FileStore::open(path)?),
            (None, None) => Arc::new(MemoryStore::new()),
        };

        let loader = Arc::new(
            FragmentLoader::new(
                self.config.registry()?,
                Arc::clone(&source),
                Arc::clone(&document),
                self.config.loader.cache_capacity,
            )
            .with_events(bus.clone()),
        );
        let pages = PageOrchestrator::new(
            Arc::clone(&loader),
            self.config.page_profiles(),
            self.config.page_settings(),
        )
        .with_events(bus.clone());
        let navigation = Arc::new(
            NavigationSync::new(Arc::clone(&document), self.config.navigation_settings())
                .with_loader(Arc::clone(&loader))
                .with_events(bus.clone()),
        );

        info!(base_url = %self.config.base_url, source = source.name(), "site assembled");
        Ok(Site {
            config: self.config,
            bus,
            document,
            source,
            store,
            system: self.system,
            loader,
            pages,
            navigation,
            theme: Mutex::new(None),
            reporter: self.reporter,
        })
    }
}

pub struct Site {
    config: SiteConfig,
    bus: EventBus,
    document: SharedDocument,
    source: Arc<dyn FragmentSource>,
    store: Arc<dyn PreferenceStore>,
    system: SystemPreferences,
    loader: Arc<FragmentLoader>,
    pages: PageOrchestrator,
    navigation: Arc<NavigationSync>,
    theme: Mutex<Option<ThemeManager>>,
    reporter: Option<Arc<dyn ErrorReporter>>,
}

/// Background listeners started by [`Site::run_events`].
pub struct EventListeners {
    pub navigation: JoinHandle<()>,
    pub theme: JoinHandle<()>,
}

impl EventListeners {
    pub fn abort(&self) {
        self.navigation.abort();
        self.theme.abort();
    }
}

impl Site {
    pub fn builder(config: SiteConfig) -> SiteBuilder {
        SiteBuilder::new(config)
    }

    /// Theme, then page fragments, then navigation. A failing step is
    /// reported and the remaining steps still run.
    #[instrument(skip(self))]
    pub async fn bootstrap(&self, page_id: &str) -> BootstrapReport {
        info!(page = page_id, "bootstrapping");
        let mut errors = Vec::new();

        let theme = match self.init_theme().await {
            Ok(theme) => Some(theme),
            Err(err) => {
                self.fail(&err).await;
                errors.push(format!("{err:#}"));
                None
            }
        };

        let pages = self
            .pages
            .initialize_page(page_id, LoadOptions::default())
            .await;
        let navigation = Some(self.navigation.synchronize().await);

        self.bus.emit(AppEvent::ApplicationInitialized);
        info!(page = page_id, errors = errors.len(), "application initialised");
        BootstrapReport {
            page: page_id.to_string(),
            theme,
            pages,
            navigation,
            errors,
        }
    }

    /// Set the location to `path` and bootstrap the page it routes to.
    pub async fn bootstrap_path(&self, path: &str) -> BootstrapReport {
        self.document.write().await.set_location(path);
        let page = page_for_path(path);
        self.bootstrap(&page).await
    }

    pub async fn theme(&self) -> Option<Theme> {
        self.theme.lock().await.as_ref().map(ThemeManager::current)
    }

    pub async fn toggle_theme(&self) -> Result<Theme> {
        let mut guard = self.theme.lock().await;
        let manager = guard.as_mut().ok_or_else(|| anyhow!("theme manager not initialised"))?;
        Ok(manager.toggle_theme().await?)
    }

    pub async fn set_theme(&self, name: &str) -> Result<Option<Theme>> {
        let mut guard = self.theme.lock().await;
        let manager = guard.as_mut().ok_or_else(|| anyhow!("theme manager not initialised"))?;
        Ok(manager.set_theme(name).await?)
    }

    pub async fn on_system_change(&self, preferences: SystemPreferences) -> Result<Option<Theme>> {
        let mut guard = self.theme.lock().await;
        let manager = guard.as_mut().ok_or_else(|| anyhow!("theme manager not initialised"))?;
        Ok(manager.on_system_change(preferences).await?)
    }

    /// Start listening on the event bus: navigation triggers and system
    /// theme preference changes.
    pub fn run_events(self: &Arc<Self>) -> EventListeners {
        let navigation = Arc::clone(&self.navigation).spawn(&self.bus);

        let mut events = self.bus.subscribe();
        let site = Arc::clone(self);
        let theme = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AppEvent::SystemPreferenceChanged(preferences)) => {
                        if let Err(err) = site.on_system_change(preferences).await {
                            warn!(error = %err, "system theme change not applied");
                        }
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        });
        EventListeners { navigation, theme }
    }

    /// Figures for the dashboard page, read through the fragment source.
    pub async fn dashboard(&self) -> Result<DashboardSummary, FixtureError> {
        Ok(DashboardData::load(self.source.as_ref()).await?.summary())
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn loader(&self) -> &Arc<FragmentLoader> {
        &self.loader
    }

    pub fn pages(&self) -> &PageOrchestrator {
        &self.pages
    }

    pub fn navigation(&self) -> &Arc<NavigationSync> {
        &self.navigation
    }

    async fn init_theme(&self) -> Result<Theme> {
        let manager = ThemeManager::initialize(
            Arc::clone(&self.store),
            &self.config.theme.storage_key,
            self.system,
            Arc::clone(&self.document),
            self.bus.clone(),
        )
        .await
        .context("theme initialisation failed")?;
        let theme = manager.current();
        *self.theme.lock().await = Some(manager);
        Ok(theme)
    }

    async fn fail(&self, err: &anyhow::Error) {
        error!(error = %format!("{err:#}"), "bootstrap step failed");
        self.document.write().await.set_status(BOOTSTRAP_ERROR_MESSAGE);
        if let Some(reporter) = &self.reporter {
            reporter.report(err);
        }
    }
}

/// Page profile id for a location path: the route's page, else the last
/// segment without extension, else `index`.
pub fn page_for_path(path: &str) -> String {
    match Route::classify(path) {
        Some(route) => route.page_id().to_string(),
        None => last_segment(path)
            .map(|s| s.split('.').next().unwrap_or(s).to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Route::Home.page_id().to_string()),
    }
}

#[cfg(test)]
mod tests;
