//! Fetch-or-cache loader with typed fallbacks.
//!
//! A load always ends with renderable content in the container (network,
//! cache or fallback) unless the fragment name is unknown, the container
//! is missing, or the fetch failed for a fragment without fallback.

use super::descriptor::{FragmentDescriptor, FragmentRegistry};
use super::initializers;
use super::sources::{Accept, FetchError, FragmentSource};
use crate::dom::{ContentOrigin, DomError, SharedDocument};
use crate::events::{AppEvent, EventBus};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Fragment \"{0}\" is not available")]
    UnknownFragment(String),
    #[error("Container \"{0}\" not found")]
    MissingContainer(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl From<DomError> for LoadError {
    fn from(err: DomError) -> Self {
        match err {
            DomError::MissingContainer(id) => LoadError::MissingContainer(id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop any cached copy and go to the network.
    pub force_reload: bool,
}

impl LoadOptions {
    pub fn forced() -> Self {
        Self { force_reload: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadOutcome {
    Network,
    Cache,
    Fallback,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResult {
    pub fragment: String,
    pub container_id: String,
    pub outcome: LoadOutcome,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LoadResult {
    pub fn new(
        fragment: &str,
        container_id: &str,
        outcome: LoadOutcome,
        error: Option<String>,
    ) -> Self {
        Self {
            fragment: fragment.to_string(),
            container_id: container_id.to_string(),
            outcome,
            error,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(fragment: &str, container_id: &str, error: impl ToString) -> Self {
        Self::new(fragment, container_id, LoadOutcome::Failed, Some(error.to_string()))
    }

    /// Content was mounted, fallback included.
    pub fn success(&self) -> bool {
        self.outcome != LoadOutcome::Failed
    }

    pub fn degraded(&self) -> bool {
        self.outcome == LoadOutcome::Fallback
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub fragment: String,
    pub container_id: String,
    pub options: LoadOptions,
}

impl LoadRequest {
    pub fn new(fragment: impl Into<String>, container_id: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            container_id: container_id.into(),
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }
}

pub struct FragmentLoader {
    registry: FragmentRegistry,
    source: Arc<dyn FragmentSource>,
    cache: Mutex<LruCache<String, String>>,
    document: SharedDocument,
    bus: Option<EventBus>,
}

impl FragmentLoader {
    /// The cache never holds fewer slots than there are registered
    /// fragments, so entries only go away on `clear_cache` or a forced reload.
    pub fn new(
        registry: FragmentRegistry,
        source: Arc<dyn FragmentSource>,
        document: SharedDocument,
        cache_capacity: usize,
    ) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity.max(registry.len()).max(1))
            .unwrap_or(NonZeroUsize::MIN);
        info!(
            fragments = registry.len(),
            capacity = capacity.get(),
            source = source.name(),
            "fragment loader initialised"
        );
        Self {
            registry,
            source,
            cache: Mutex::new(LruCache::new(capacity)),
            document,
            bus: None,
        }
    }

    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn registry(&self) -> &FragmentRegistry {
        &self.registry
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    /// `true` when content (network, cache or fallback) was mounted.
    pub async fn load(&self, name: &str, container_id: &str, options: LoadOptions) -> bool {
        self.load_detailed(name, container_id, options).await.success()
    }

    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn load_detailed(
        &self,
        name: &str,
        container_id: &str,
        options: LoadOptions,
    ) -> LoadResult {
        match self.try_load(name, container_id, options).await {
            Ok(outcome) => LoadResult::new(name, container_id, outcome, None),
            Err(err) => {
                error!(fragment = name, container = container_id, error = %err, "fragment load failed");
                LoadResult::failed(name, container_id, err)
            }
        }
    }

    /// Load a batch concurrently; results come back in request order.
    pub async fn load_many(&self, requests: &[LoadRequest]) -> Vec<LoadResult> {
        info!(count = requests.len(), "loading fragments concurrently");
        let results = join_all(
            requests
                .iter()
                .map(|r| self.load_detailed(&r.fragment, &r.container_id, r.options)),
        )
        .await;
        let succeeded = results.iter().filter(|r| r.success()).count();
        info!(succeeded, total = requests.len(), "batch load finished");
        results
    }

    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
        info!("fragment cache cleared");
    }

    pub async fn cached(&self, name: &str) -> Option<String> {
        self.cache.lock().await.get(name).cloned()
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }

    async fn try_load(
        &self,
        name: &str,
        container_id: &str,
        options: LoadOptions,
    ) -> Result<LoadOutcome, LoadError> {
        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| LoadError::UnknownFragment(name.to_string()))?;
        if !self.document.read().await.has_container(container_id) {
            return Err(LoadError::MissingContainer(container_id.to_string()));
        }

        if options.force_reload {
            self.cache.lock().await.pop(name);
        } else if let Some(markup) = self.cached(name).await {
            debug!(fragment = name, "serving fragment from cache");
            self.mount(descriptor, container_id, markup, ContentOrigin::Cache)
                .await?;
            return Ok(LoadOutcome::Cache);
        }

        match self.source.fetch(&descriptor.source_path, Accept::Html).await {
            Ok(markup) => {
                self.cache
                    .lock()
                    .await
                    .put(name.to_string(), markup.clone());
                self.mount(descriptor, container_id, markup, ContentOrigin::Network)
                    .await?;
                info!(fragment = name, container = container_id, "fragment loaded");
                Ok(LoadOutcome::Network)
            }
            Err(err) => {
                let Some(template) = &descriptor.fallback else {
                    return Err(err.into());
                };
                warn!(fragment = name, error = %err, "fetch failed, mounting fallback");
                self.mount(descriptor, container_id, template.render(), ContentOrigin::Fallback)
                    .await?;
                Ok(LoadOutcome::Fallback)
            }
        }
    }

    async fn mount(
        &self,
        descriptor: &FragmentDescriptor,
        container_id: &str,
        markup: String,
        origin: ContentOrigin,
    ) -> Result<(), LoadError> {
        let bindings = initializers::bind(&descriptor.name, &markup);
        self.document
            .write()
            .await
            .mount(container_id, markup, origin, bindings)?;
        if let Some(bus) = &self.bus {
            bus.emit(AppEvent::FragmentMounted {
                fragment: descriptor.name.clone(),
                container_id: container_id.to_string(),
                origin,
            });
        }
        Ok(())
    }
}
