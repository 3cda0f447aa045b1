//! Keeps the active navigation link and the breadcrumb in step with the
//! current location.

use super::breadcrumb::Breadcrumb;
use super::route::{is_home, last_segment, Route};
use super::scroll::ScrollTracker;
use super::sidebar::{SidebarState, MOBILE_BREAKPOINT};
use crate::dom::{ContentOrigin, Link, SharedDocument, BREADCRUMB_CONTAINER, SIDEBAR_CONTAINER};
use crate::events::{AppEvent, Debouncer, EventBus};
use crate::fragments::{FragmentLoader, LoadOptions};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Links inside the breadcrumb trail never become the active link.
const BREADCRUMB_LINK_CLASS: &str = "breadcrumb-lien";
/// Stand-in origin used to resolve relative hrefs against the location.
const LOCAL_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationSettings {
    pub debounce: Duration,
    pub scroll_threshold: f64,
    /// Periodic `verify()`; disabled when `None`.
    pub watchdog_interval: Option<Duration>,
    pub force_sync_poll: Duration,
    pub force_sync_attempts: u32,
    /// Viewport width from which the sidebar stays closed and overlay-free.
    pub mobile_breakpoint: u32,
}

impl Default for NavigationSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            scroll_threshold: 100.0,
            watchdog_interval: None,
            force_sync_poll: Duration::from_millis(200),
            force_sync_attempts: 50,
            mobile_breakpoint: MOBILE_BREAKPOINT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub path: String,
    pub route: Option<Route>,
    pub active_href: Option<String>,
    pub breadcrumb: Vec<String>,
    pub breadcrumb_rendered: bool,
}

pub struct NavigationSync {
    document: SharedDocument,
    loader: Option<Arc<FragmentLoader>>,
    bus: Option<EventBus>,
    settings: NavigationSettings,
    debouncer: Debouncer,
    scroll: Mutex<ScrollTracker>,
    sidebar: Mutex<SidebarState>,
    initialized: AtomicBool,
    passes: AtomicUsize,
}

impl NavigationSync {
    pub fn new(document: SharedDocument, settings: NavigationSettings) -> Self {
        Self {
            document,
            loader: None,
            bus: None,
            debouncer: Debouncer::new(settings.debounce),
            scroll: Mutex::new(ScrollTracker::new(settings.scroll_threshold)),
            sidebar: Mutex::new(SidebarState::new(settings.mobile_breakpoint)),
            settings,
            initialized: AtomicBool::new(false),
            passes: AtomicUsize::new(0),
        }
    }

    /// Loader used to restore fragment containers that were emptied.
    pub fn with_loader(mut self, loader: Arc<FragmentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Bus that hears `SidebarOpened` / `SidebarClosed`.
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn settings(&self) -> &NavigationSettings {
        &self.settings
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Completed synchronisation passes.
    pub fn passes(&self) -> usize {
        self.passes.load(Ordering::Acquire)
    }

    /// Clear every active marker, mark the link of the current route and
    /// rebuild the breadcrumb. Running it twice yields the same document.
    #[instrument(skip(self))]
    pub async fn synchronize(&self) -> SyncReport {
        let mut document = self.document.write().await;
        let path = document.location().to_string();
        let route = Route::classify(&path);

        document.clear_active();
        let mut active_href =
            route.and_then(|r| document.activate_first(|l| is_navigation(l) && r.matches_href(&l.href)));
        if active_href.is_none() {
            if let Some(segment) = last_segment(&path) {
                active_href =
                    document.activate_first(|l| is_navigation(l) && l.href.contains(segment));
            }
        }
        match &active_href {
            Some(href) => debug!(path = %path, href = %href, "active link marked"),
            None => warn!(
                path = %path,
                available = ?document.links().map(|l| l.href.as_str()).collect::<Vec<_>>(),
                "no navigation link matches the current location"
            ),
        }

        let breadcrumb = Breadcrumb::from_path(&path);
        let breadcrumb_rendered = document
            .mount(
                BREADCRUMB_CONTAINER,
                breadcrumb.render(),
                ContentOrigin::Generated,
                Vec::new(),
            )
            .is_ok();
        if !breadcrumb_rendered {
            warn!("breadcrumb container not found");
        }
        drop(document);

        self.initialized.store(true, Ordering::Release);
        self.passes.fetch_add(1, Ordering::AcqRel);
        info!(path = %path, route = ?route, "navigation synchronised");

        SyncReport {
            route,
            active_href,
            breadcrumb: breadcrumb.labels().into_iter().map(str::to_string).collect(),
            breadcrumb_rendered,
            path,
        }
    }

    /// Debounced `synchronize`: bursts of triggers collapse into one pass.
    pub async fn schedule(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.debouncer
            .schedule(async move {
                this.synchronize().await;
            })
            .await;
    }

    pub async fn handle(self: &Arc<Self>, event: &AppEvent) {
        match event {
            AppEvent::DocumentLoaded => {
                self.synchronize().await;
            }
            AppEvent::LinkClicked { href } => {
                if href.contains('#') {
                    return;
                }
                let current = self.document.read().await.location().to_string();
                match internal_path(&current, href) {
                    Some(path) => {
                        self.document.write().await.set_location(path);
                        self.schedule().await;
                    }
                    None => debug!(href = %href, "external link ignored"),
                }
            }
            AppEvent::HistoryNavigated { path } => {
                self.document.write().await.set_location(path.clone());
                self.schedule().await;
            }
            AppEvent::Scrolled { offset } => {
                self.on_scroll(*offset).await;
            }
            AppEvent::MenuButtonClicked => {
                self.toggle_sidebar().await;
            }
            AppEvent::OverlayClicked => {
                self.close_sidebar().await;
            }
            AppEvent::KeyPressed { key } => {
                self.on_key(key).await;
            }
            AppEvent::Resized { width } => {
                self.on_resize(*width).await;
            }
            AppEvent::ContainerCleared { container_id } => {
                info!(container = %container_id, "container emptied, restoring navigation");
                self.restore(container_id).await;
                self.synchronize().await;
            }
            _ => {}
        }
    }

    /// Watchdog check: once initialised, re-synchronise if the sidebar or
    /// breadcrumb container came up empty. Returns whether it did.
    pub async fn verify(&self) -> bool {
        if !self.is_initialized() {
            return false;
        }
        let empty: Vec<String> = {
            let document = self.document.read().await;
            [SIDEBAR_CONTAINER, BREADCRUMB_CONTAINER]
                .into_iter()
                .filter(|id| document.container(id).is_some_and(|c| c.is_empty()))
                .map(str::to_string)
                .collect()
        };
        if empty.is_empty() {
            return false;
        }
        info!(containers = ?empty, "empty navigation containers detected");
        for container in &empty {
            self.restore(container).await;
        }
        self.synchronize().await;
        true
    }

    /// Wait until both navigation containers exist, then synchronise.
    /// Checks `force_sync_attempts` times (at least once), `force_sync_poll`
    /// apart, and gives up right after the last check.
    pub async fn force_synchronize(&self) -> Option<SyncReport> {
        let attempts = self.settings.force_sync_attempts.max(1);
        for attempt in 1..=attempts {
            let ready = {
                let document = self.document.read().await;
                document.has_container(SIDEBAR_CONTAINER) && document.has_container(BREADCRUMB_CONTAINER)
            };
            if ready {
                return Some(self.synchronize().await);
            }
            if attempt == attempts {
                break;
            }
            debug!(attempt, "waiting for navigation containers");
            tokio::time::sleep(self.settings.force_sync_poll).await;
        }
        warn!(attempts, "navigation containers never appeared");
        None
    }

    /// Returns the new breadcrumb visibility when it changed.
    pub async fn on_scroll(&self, offset: f64) -> Option<bool> {
        let mut document = self.document.write().await;
        if is_home(document.location()) || !document.has_container(BREADCRUMB_CONTAINER) {
            return None;
        }
        let hidden = self.scroll.lock().await.update(offset)?;
        document.set_breadcrumb_hidden(hidden);
        debug!(offset, hidden, "breadcrumb visibility changed");
        Some(hidden)
    }

    pub async fn sidebar_state(&self) -> SidebarState {
        self.sidebar.lock().await.clone()
    }

    /// The `open_sidebar` family returns the new open state when it changed.
    pub async fn open_sidebar(&self) -> Option<bool> {
        self.update_sidebar(SidebarState::open).await
    }

    pub async fn close_sidebar(&self) -> Option<bool> {
        self.update_sidebar(SidebarState::close).await
    }

    pub async fn toggle_sidebar(&self) -> Option<bool> {
        self.update_sidebar(|sidebar| {
            sidebar.toggle();
            true
        })
        .await
    }

    pub async fn on_key(&self, key: &str) -> Option<bool> {
        self.update_sidebar(|sidebar| sidebar.key_pressed(key)).await
    }

    pub async fn on_resize(&self, width: u32) -> Option<bool> {
        self.update_sidebar(|sidebar| sidebar.resized(width)).await
    }

    async fn update_sidebar<F>(&self, transition: F) -> Option<bool>
    where
        F: FnOnce(&mut SidebarState) -> bool,
    {
        let mut document = self.document.write().await;
        let mut sidebar = self.sidebar.lock().await;
        if !transition(&mut sidebar) {
            return None;
        }
        let open = sidebar.is_open();
        document.set_sidebar(open, sidebar.overlay_visible());
        debug!(open, overlay = sidebar.overlay_visible(), "sidebar state changed");
        drop(sidebar);
        drop(document);

        if let Some(bus) = &self.bus {
            bus.emit(if open {
                AppEvent::SidebarOpened
            } else {
                AppEvent::SidebarClosed
            });
        }
        Some(open)
    }

    /// Listen on `bus` until it closes; runs the watchdog alongside when enabled.
    pub fn spawn(self: Arc<Self>, bus: &EventBus) -> JoinHandle<()> {
        let mut events = bus.subscribe();
        tokio::spawn(async move {
            let mut watchdog = self.settings.watchdog_interval.map(|period| {
                let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval
            });
            loop {
                tokio::select! {
                    received = events.recv() => match received {
                        Ok(event) => self.handle(&event).await,
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "navigation listener lagged, resynchronising");
                            self.schedule().await;
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = tick(&mut watchdog) => {
                        self.verify().await;
                    }
                }
            }
            debug!("navigation listener stopped");
        })
    }

    /// Reload the fragment registered for an emptied container. The
    /// breadcrumb is regenerated by `synchronize` instead.
    async fn restore(&self, container_id: &str) {
        if container_id == BREADCRUMB_CONTAINER {
            return;
        }
        let Some(loader) = &self.loader else {
            return;
        };
        let Some(fragment) = loader
            .registry()
            .iter()
            .find(|d| d.container_id == container_id)
            .map(|d| d.name.clone())
        else {
            return;
        };
        if !loader.load(&fragment, container_id, LoadOptions::default()).await {
            warn!(fragment = %fragment, "could not restore fragment");
        }
    }
}

fn is_navigation(link: &Link) -> bool {
    !link.has_class(BREADCRUMB_LINK_CLASS)
}

async fn tick(watchdog: &mut Option<Interval>) {
    match watchdog {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Path of `href` resolved against the current location, or `None` when it
/// leaves the site.
pub fn internal_path(current: &str, href: &str) -> Option<String> {
    let origin = Url::parse(LOCAL_ORIGIN).ok()?;
    let base = origin.join(current).ok()?;
    let target = base.join(href).ok()?;
    (target.origin() == origin.origin()).then(|| target.path().to_string())
}
