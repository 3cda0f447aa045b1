use super::{PreferenceStore, StoreError, SystemPreferences, Theme};
use crate::dom::SharedDocument;
use crate::events::{AppEvent, EventBus};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const THEME_ATTRIBUTE: &str = "data-theme";

/// Owns the current theme and reflects it on the document root.
///
/// Only explicit user choices are written to the store; the initial
/// resolution from system preferences is not, so a later change of the
/// system preference still applies until the user picks a theme.
pub struct ThemeManager {
    store: Arc<dyn PreferenceStore>,
    key: String,
    system: SystemPreferences,
    current: Theme,
    document: SharedDocument,
    bus: EventBus,
}

impl ThemeManager {
    #[instrument(skip(store, document, bus))]
    pub async fn initialize(
        store: Arc<dyn PreferenceStore>,
        key: &str,
        system: SystemPreferences,
        document: SharedDocument,
        bus: EventBus,
    ) -> Result<Self, StoreError> {
        let stored = stored_theme(store.as_ref(), key)?;
        let current = stored.unwrap_or_else(|| system.resolve());
        let mut manager = Self {
            store,
            key: key.to_string(),
            system,
            current,
            document,
            bus,
        };
        manager.apply(current).await;
        info!(theme = %current, explicit = stored.is_some(), "theme initialised");
        Ok(manager)
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn available(&self) -> Vec<Theme> {
        Theme::ALL.to_vec()
    }

    pub fn is_supported(&self, name: &str) -> bool {
        Theme::parse(name).is_some()
    }

    pub fn icon(&self) -> &'static str {
        self.current.icon()
    }

    /// Flip between light and dark and remember the choice.
    pub async fn toggle_theme(&mut self) -> Result<Theme, StoreError> {
        let target = self.current.toggled();
        info!(from = %self.current, to = %target, "theme toggle requested");
        self.choose(target).await
    }

    pub async fn next_theme(&mut self) -> Result<Theme, StoreError> {
        self.choose(self.current.next()).await
    }

    /// Switch to a named theme. Unknown names are logged and ignored.
    pub async fn set_theme(&mut self, name: &str) -> Result<Option<Theme>, StoreError> {
        match Theme::parse(name) {
            Some(theme) => self.choose(theme).await.map(Some),
            None => {
                error!(theme = name, available = ?Theme::ALL, "invalid theme");
                Ok(None)
            }
        }
    }

    /// Re-resolve from the new system preferences unless the user chose a theme.
    pub async fn on_system_change(
        &mut self,
        preferences: SystemPreferences,
    ) -> Result<Option<Theme>, StoreError> {
        self.system = preferences;
        if stored_theme(self.store.as_ref(), &self.key)?.is_some() {
            return Ok(None);
        }
        let theme = preferences.resolve();
        self.apply(theme).await;
        Ok(Some(theme))
    }

    /// Forget the explicit choice and fall back to system preferences.
    pub async fn reset(&mut self) -> Result<Theme, StoreError> {
        self.store.remove(&self.key)?;
        let theme = self.system.resolve();
        self.apply(theme).await;
        info!(theme = %theme, "theme reset to system preference");
        Ok(theme)
    }

    async fn choose(&mut self, theme: Theme) -> Result<Theme, StoreError> {
        self.store.set(&self.key, theme.as_str())?;
        self.apply(theme).await;
        Ok(theme)
    }

    async fn apply(&mut self, theme: Theme) {
        self.document
            .write()
            .await
            .set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
        self.current = theme;
        self.bus.emit(AppEvent::ThemeChanged {
            theme,
            at: Utc::now(),
        });
    }
}

fn stored_theme(store: &dyn PreferenceStore, key: &str) -> Result<Option<Theme>, StoreError> {
    Ok(store.get(key)?.and_then(|value| {
        let theme = Theme::parse(&value);
        if theme.is_none() {
            warn!(value = %value, "ignoring unsupported stored theme");
        }
        theme
    }))
}
