//! Named events standing in for DOM listeners and observers.
//!
//! Everything that reacts to "page loaded", "link clicked", "history
//! navigated", "scrolled", "resized" or "container emptied" subscribes to
//! the [`EventBus`], so tests drive behaviour by emitting synthetic events.

mod bus;
mod debounce;

pub use bus::EventBus;
pub use debounce::Debouncer;

use crate::dom::ContentOrigin;
use crate::theme::{SystemPreferences, Theme};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    DocumentLoaded,
    LinkClicked { href: String },
    HistoryNavigated { path: String },
    Scrolled { offset: f64 },
    /// Viewport width in CSS pixels.
    Resized { width: u32 },
    KeyPressed { key: String },
    /// The hamburger button toggling the sidebar.
    MenuButtonClicked,
    /// A click on the dimmed overlay behind the mobile sidebar.
    OverlayClicked,
    SidebarOpened,
    SidebarClosed,
    ContainerCleared { container_id: String },
    FragmentMounted {
        fragment: String,
        container_id: String,
        origin: ContentOrigin,
    },
    ThemeChanged { theme: Theme, at: DateTime<Utc> },
    SystemPreferenceChanged(SystemPreferences),
    PageInitialized { page: String },
    ApplicationInitialized,
}
