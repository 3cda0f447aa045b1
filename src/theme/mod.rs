//! Light/dark theme resolution, persistence and application.

mod manager;
mod store;

pub use manager::ThemeManager;
pub use store::{FileStore, MemoryStore, PreferenceStore, StoreError};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key holding the explicit theme choice in the preference store.
pub const THEME_STORAGE_KEY: &str = "theme-prefere-epl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "clair")]
    Light,
    #[serde(rename = "sombre")]
    Dark,
}

impl Theme {
    /// Rotation order.
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "clair",
            Theme::Dark => "sombre",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Inner SVG of the theme button icon: a moon in dark mode, a sun otherwise.
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Dark => r#"<path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"/>"#,
            Theme::Light => concat!(
                r#"<circle cx="12" cy="12" r="5"/>"#,
                r#"<path d="M12 1v2M12 21v2M4.22 4.22l1.42 1.42M18.36 18.36l1.42 1.42M1 12h2M21 12h2M4.22 19.78l1.42-1.42M18.36 5.64l1.42-1.42"/>"#
            ),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host reports through `prefers-color-scheme` / `prefers-contrast`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemPreferences {
    pub prefers_dark: bool,
    pub prefers_high_contrast: bool,
}

impl SystemPreferences {
    pub fn dark() -> Self {
        Self {
            prefers_dark: true,
            prefers_high_contrast: false,
        }
    }

    /// High contrast wins over dark mode and maps to the light theme.
    pub fn resolve(&self) -> Theme {
        if self.prefers_high_contrast {
            Theme::Light
        } else if self.prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[cfg(test)]
mod tests;
