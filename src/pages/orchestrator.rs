//! Loads every fragment a page needs concurrently and aggregates the outcome.

use super::notice;
use super::profile::PageProfiles;
use super::stats::LoadStatistics;
use crate::dom::{ContentOrigin, SharedDocument};
use crate::events::{AppEvent, EventBus};
use crate::fragments::{container_id_for, FragmentLoader, LoadOptions, LoadResult};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    /// Also raise the degraded-mode notice when every failure was masked by a fallback.
    pub notify_on_degraded: bool,
    pub notification_ttl: Duration,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            notify_on_degraded: false,
            notification_ttl: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub page: String,
    pub results: Vec<LoadResult>,
    pub elapsed_ms: f64,
    pub notification: Option<Uuid>,
}

impl PageReport {
    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.success()).count()
    }

    pub fn degraded(&self) -> usize {
        self.results.iter().filter(|r| r.degraded()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.results.len() - self.failures()
    }
}

pub struct PageOrchestrator {
    loader: Arc<FragmentLoader>,
    profiles: PageProfiles,
    settings: PageSettings,
    stats: Mutex<LoadStatistics>,
    bus: Option<EventBus>,
}

impl PageOrchestrator {
    pub fn new(loader: Arc<FragmentLoader>, profiles: PageProfiles, settings: PageSettings) -> Self {
        Self {
            loader,
            profiles,
            settings,
            stats: Mutex::new(LoadStatistics::default()),
            bus: None,
        }
    }

    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn profiles(&self) -> &PageProfiles {
        &self.profiles
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Container a fragment mounts into on every page.
    pub fn container_for(&self, fragment: &str) -> String {
        self.loader
            .registry()
            .get(fragment)
            .map(|d| d.container_id.clone())
            .unwrap_or_else(|| container_id_for(fragment))
    }

    /// `None` when no profile exists for `page_id`; that is a no-op, not an error.
    #[instrument(skip(self, options))]
    pub async fn initialize_page(&self, page_id: &str, options: LoadOptions) -> Option<PageReport> {
        let Some(fragments) = self.profiles.get(page_id) else {
            warn!(page = page_id, "no fragments configured for page");
            return None;
        };
        info!(page = page_id, fragments = ?fragments, "initialising page");
        let started = Instant::now();

        let targets: Vec<(String, String)> = fragments
            .iter()
            .map(|name| (name.clone(), self.container_for(name)))
            .collect();
        self.show_placeholders(&targets).await;

        let handles = targets.iter().cloned().map(|(fragment, container)| {
            let loader = Arc::clone(&self.loader);
            tokio::spawn(async move {
                let result = loader.load_detailed(&fragment, &container, options).await;
                if !result.success() {
                    loader.document().write().await.clear_placeholder(&container);
                }
                result
            })
        });
        let settled = join_all(handles).await;

        let mut results = Vec::with_capacity(settled.len());
        for (joined, (fragment, container)) in settled.into_iter().zip(&targets) {
            match joined {
                Ok(result) => results.push(result),
                Err(err) => {
                    error!(fragment = %fragment, error = %err, "fragment load task aborted");
                    self.document().write().await.clear_placeholder(container);
                    results.push(LoadResult::failed(fragment, container, err));
                }
            }
        }

        let elapsed = started.elapsed();
        self.stats.lock().await.record(&results, elapsed);

        let failures = results.iter().filter(|r| !r.success()).count();
        let degraded = results.iter().filter(|r| r.degraded()).count();
        info!(
            page = page_id,
            succeeded = results.len() - failures,
            failures,
            degraded,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "page initialised"
        );

        let notification = if failures > 0 || (self.settings.notify_on_degraded && degraded > 0) {
            Some(self.notify_degraded().await)
        } else {
            None
        };

        if let Some(bus) = &self.bus {
            bus.emit(AppEvent::PageInitialized {
                page: page_id.to_string(),
            });
        }

        Some(PageReport {
            page: page_id.to_string(),
            results,
            elapsed_ms: elapsed.as_secs_f64() * 1000.0,
            notification,
        })
    }

    pub async fn statistics(&self) -> LoadStatistics {
        *self.stats.lock().await
    }

    pub async fn reset_statistics(&self) {
        *self.stats.lock().await = LoadStatistics::default();
        info!("load statistics reset");
    }

    fn document(&self) -> &SharedDocument {
        self.loader.document()
    }

    async fn show_placeholders(&self, targets: &[(String, String)]) {
        let mut document = self.document().write().await;
        for (fragment, container) in targets {
            if document
                .mount(
                    container,
                    notice::placeholder_markup(fragment),
                    ContentOrigin::Placeholder,
                    Vec::new(),
                )
                .is_err()
            {
                debug!(fragment = %fragment, container = %container, "no container for placeholder");
            }
        }
    }

    /// Show the degraded-mode notice and schedule its expiry.
    async fn notify_degraded(&self) -> Uuid {
        let notification = notice::degraded_mode();
        let id = notification.id;
        self.document().write().await.push_notification(notification);

        let document = Arc::clone(self.document());
        let ttl = self.settings.notification_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if document.write().await.dismiss_notification(id) {
                debug!(%id, "degraded-mode notification expired");
            }
        });
        id
    }
}
