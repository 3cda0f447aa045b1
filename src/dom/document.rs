use super::markup;
use crate::events::{AppEvent, EventBus};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub type SharedDocument = Arc<RwLock<Document>>;

/// Class marking the link of the current route.
pub const ACTIVE_CLASS: &str = "actif";
const ARIA_CURRENT_PAGE: &str = "page";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("Container \"{0}\" not found")]
    MissingContainer(String),
}

/// Where the markup currently held by a container came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentOrigin {
    Network,
    Cache,
    Fallback,
    Placeholder,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
    pub label: String,
    pub classes: BTreeSet<String>,
    pub aria_current: Option<String>,
}

impl Link {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
            classes: BTreeSet::new(),
            aria_current: None,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_active(&self) -> bool {
        self.has_class(ACTIVE_CLASS)
    }

    fn activate(&mut self) {
        self.classes.insert(ACTIVE_CLASS.to_string());
        self.aria_current = Some(ARIA_CURRENT_PAGE.to_string());
    }

    fn deactivate(&mut self) {
        self.classes.remove(ACTIVE_CLASS);
        self.aria_current = None;
    }
}

impl From<markup::Anchor> for Link {
    fn from(anchor: markup::Anchor) -> Self {
        Self {
            href: anchor.href,
            label: anchor.text,
            classes: anchor.classes,
            aria_current: None,
        }
    }
}

/// Interaction attached to every element matching `selector` inside a
/// mounted container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub selector: String,
    pub matches: usize,
    pub action: BindingAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BindingAction {
    /// Swap the label for `text`, restore it after the delay.
    LoadingFeedback { text: String, restore_after_ms: u64 },
    Navigate { href: String },
    PressEffect { scale: f32, duration_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    pub id: String,
    pub markup: String,
    pub origin: Option<ContentOrigin>,
    pub links: Vec<Link>,
    pub bindings: Vec<Binding>,
}

impl Container {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            markup: String::new(),
            origin: None,
            links: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        markup::is_blank(&self.markup)
    }

    fn reset(&mut self) {
        self.markup.clear();
        self.origin = None;
        self.links.clear();
        self.bindings.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub dismissible: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            dismissible: true,
            created_at: Utc::now(),
        }
    }
}

/// Comparable view of everything a user could observe on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSnapshot {
    pub location: String,
    pub root_attributes: BTreeMap<String, String>,
    pub containers: Vec<Container>,
    pub shell_links: Vec<Link>,
    pub notifications: Vec<Notification>,
    pub status: Option<String>,
    pub breadcrumb_hidden: bool,
    pub sidebar_open: bool,
    pub sidebar_overlay_visible: bool,
}

#[derive(Debug)]
pub struct Document {
    location: String,
    root_attributes: BTreeMap<String, String>,
    // page-shell order, which is also link lookup order
    containers: Vec<Container>,
    shell_links: Vec<Link>,
    notifications: Vec<Notification>,
    status: Option<String>,
    breadcrumb_hidden: bool,
    sidebar_open: bool,
    sidebar_overlay_visible: bool,
    observer: Option<EventBus>,
}

impl Document {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            root_attributes: BTreeMap::new(),
            containers: Vec::new(),
            shell_links: Vec::new(),
            notifications: Vec::new(),
            status: None,
            breadcrumb_hidden: false,
            sidebar_open: false,
            sidebar_overlay_visible: false,
            observer: None,
        }
    }

    /// The shell every EPL page ships: sidebar, breadcrumb, CTA and footer slots.
    pub fn standard_shell(location: impl Into<String>) -> Self {
        Self::new(location)
            .with_container(super::SIDEBAR_CONTAINER)
            .with_container(super::BREADCRUMB_CONTAINER)
            .with_container(super::CTA_CONTAINER)
            .with_container(super::FOOTER_CONTAINER)
    }

    pub fn with_container(mut self, id: impl Into<String>) -> Self {
        self.add_container(id);
        self
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.shell_links.push(link);
        self
    }

    /// Report external clears on `bus` as `ContainerCleared`.
    pub fn with_observer(mut self, bus: EventBus) -> Self {
        self.observer = Some(bus);
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Adds an empty container; existing ids are left untouched.
    pub fn add_container(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.has_container(&id) {
            self.containers.push(Container::new(id));
        }
    }

    pub fn has_container(&self, id: &str) -> bool {
        self.containers.iter().any(|c| c.id == id)
    }

    pub fn container(&self, id: &str) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.container(id).map(|c| c.markup.as_str())
    }

    fn container_mut(&mut self, id: &str) -> Result<&mut Container, DomError> {
        self.containers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomError::MissingContainer(id.to_string()))
    }

    /// Replace a container's subtree. Links are re-extracted and previous
    /// bindings dropped, so remounting never stacks handlers.
    pub fn mount(
        &mut self,
        id: &str,
        markup: String,
        origin: ContentOrigin,
        bindings: Vec<Binding>,
    ) -> Result<(), DomError> {
        let container = self.container_mut(id)?;
        container.links = markup::anchors(&markup).into_iter().map(Link::from).collect();
        container.markup = markup;
        container.origin = Some(origin);
        container.bindings = bindings;
        Ok(())
    }

    /// Empty a container as external code would, notifying the observer.
    pub fn clear(&mut self, id: &str) -> Result<(), DomError> {
        self.container_mut(id)?.reset();
        if let Some(bus) = &self.observer {
            bus.emit(AppEvent::ContainerCleared {
                container_id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Drop a loading placeholder if it is still showing. Returns whether
    /// anything was removed.
    pub fn clear_placeholder(&mut self, id: &str) -> bool {
        match self.container_mut(id) {
            Ok(container) if container.origin == Some(ContentOrigin::Placeholder) => {
                container.reset();
                true
            }
            _ => false,
        }
    }

    /// Shell links first, then container links in shell order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.shell_links
            .iter()
            .chain(self.containers.iter().flat_map(|c| c.links.iter()))
    }

    fn links_mut(&mut self) -> impl Iterator<Item = &mut Link> {
        self.shell_links
            .iter_mut()
            .chain(self.containers.iter_mut().flat_map(|c| c.links.iter_mut()))
    }

    pub fn active_links(&self) -> Vec<&Link> {
        self.links().filter(|l| l.is_active()).collect()
    }

    pub fn clear_active(&mut self) {
        for link in self.links_mut() {
            link.deactivate();
        }
    }

    /// Mark the first link accepted by `predicate` as current. Returns its href.
    pub fn activate_first<F>(&mut self, predicate: F) -> Option<String>
    where
        F: Fn(&Link) -> bool,
    {
        let link = self.links_mut().find(|l| predicate(l))?;
        link.activate();
        Some(link.href.clone())
    }

    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes.get(name).map(String::as_str)
    }

    pub fn set_root_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.root_attributes.insert(name.into(), value.into());
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn push_notification(&mut self, notification: Notification) {
        debug!(id = %notification.id, title = %notification.title, "notification shown");
        self.notifications.push(notification);
    }

    pub fn dismiss_notification(&mut self, id: Uuid) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        before != self.notifications.len()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Text of the polite live region read out by screen readers.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn breadcrumb_hidden(&self) -> bool {
        self.breadcrumb_hidden
    }

    pub fn set_breadcrumb_hidden(&mut self, hidden: bool) {
        self.breadcrumb_hidden = hidden;
    }

    /// Whether the sidebar carries its `ouvert` class.
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn sidebar_overlay_visible(&self) -> bool {
        self.sidebar_overlay_visible
    }

    /// An overlay is only shown over an open sidebar.
    pub fn set_sidebar(&mut self, open: bool, overlay_visible: bool) {
        self.sidebar_open = open;
        self.sidebar_overlay_visible = open && overlay_visible;
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            location: self.location.clone(),
            root_attributes: self.root_attributes.clone(),
            containers: self.containers.clone(),
            shell_links: self.shell_links.clone(),
            notifications: self.notifications.clone(),
            status: self.status.clone(),
            breadcrumb_hidden: self.breadcrumb_hidden,
            sidebar_open: self.sidebar_open,
            sidebar_overlay_visible: self.sidebar_overlay_visible,
        }
    }
}
