//! Site configuration: TOML file, `.env` and environment overrides.

use crate::fragments::{FragmentDescriptor, FragmentRegistry, RegistryError};
use crate::navigation::NavigationSettings;
use crate::pages::{PageProfiles, PageSettings};
use crate::theme::THEME_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const CONFIG_PATH_VAR: &str = "EPL_CONFIG";
pub const BASE_URL_VAR: &str = "EPL_BASE_URL";
pub const NOTIFY_ON_DEGRADED_VAR: &str = "EPL_NOTIFY_ON_DEGRADED";
pub const THEME_STORE_VAR: &str = "EPL_THEME_STORE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid base URL {value}: {source}")]
    BaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
    #[error("Page \"{page}\" references unknown fragment \"{fragment}\"")]
    UnknownFragment { page: String, fragment: String },
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    /// Per-fragment overrides, or new fragments when `source` is set.
    pub fragments: BTreeMap<String, FragmentOverride>,
    /// Extra or replacement page profiles.
    pub pages: BTreeMap<String, Vec<String>>,
    pub loader: LoaderConfig,
    pub navigation: NavigationConfig,
    pub notifications: NotificationConfig,
    pub theme: ThemeConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentOverride {
    pub source: Option<String>,
    pub container: Option<String>,
    /// `false` drops the built-in fallback template.
    pub fallback: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    pub cache_capacity: usize,
    pub request_timeout_ms: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    pub debounce_ms: u64,
    pub scroll_threshold_px: f64,
    pub watchdog_interval_ms: Option<u64>,
    pub force_sync_poll_ms: u64,
    pub force_sync_attempts: u32,
    pub mobile_breakpoint_px: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct NotificationConfig {
    pub ttl_ms: u64,
    pub notify_on_degraded: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    /// JSON file backing the preference store; in-memory when absent.
    pub store_path: Option<PathBuf>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            fragments: BTreeMap::new(),
            pages: BTreeMap::new(),
            loader: LoaderConfig::default(),
            navigation: NavigationConfig::default(),
            notifications: NotificationConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 16,
            request_timeout_ms: 10_000,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 100,
            scroll_threshold_px: 100.0,
            watchdog_interval_ms: None,
            force_sync_poll_ms: 200,
            force_sync_attempts: 50,
            mobile_breakpoint_px: crate::navigation::MOBILE_BREAKPOINT,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 5_000,
            notify_on_degraded: false,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: THEME_STORAGE_KEY.to_string(),
            store_path: None,
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// `.env`, then the file named by `EPL_CONFIG` (defaults otherwise),
    /// then the `EPL_*` overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            info!(".env loaded");
        }
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => {
                info!(path = %path, "loading site configuration");
                Self::from_file(path)?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `EPL_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(BASE_URL_VAR) {
            self.base_url = base;
        }
        if let Some(raw) = lookup(NOTIFY_ON_DEGRADED_VAR) {
            self.notifications.notify_on_degraded =
                parse_flag(&raw).ok_or_else(|| ConfigError::InvalidValue {
                    key: NOTIFY_ON_DEGRADED_VAR.to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(path) = lookup(THEME_STORE_VAR) {
            self.theme.store_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        let positive = [
            ("loader.request_timeout_ms", self.loader.request_timeout_ms),
            ("navigation.force_sync_poll_ms", self.navigation.force_sync_poll_ms),
            ("notifications.ttl_ms", self.notifications.ttl_ms),
            ("navigation.mobile_breakpoint_px", u64::from(self.navigation.mobile_breakpoint_px)),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.to_string(),
                });
            }
        }
        if self.navigation.watchdog_interval_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "navigation.watchdog_interval_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if !self.navigation.scroll_threshold_px.is_finite() || self.navigation.scroll_threshold_px < 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "navigation.scroll_threshold_px".to_string(),
                value: self.navigation.scroll_threshold_px.to_string(),
            });
        }

        let registry = self.registry()?;
        for (page, fragments) in self.page_profiles().iter() {
            if let Some(unknown) = fragments.iter().find(|f| !registry.contains(f)) {
                return Err(ConfigError::UnknownFragment {
                    page: page.to_string(),
                    fragment: unknown.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url).map_err(|source| ConfigError::BaseUrl {
            value: self.base_url.clone(),
            source,
        })
    }

    /// Built-in registry with the configured overrides applied.
    pub fn registry(&self) -> Result<FragmentRegistry, ConfigError> {
        let mut registry = FragmentRegistry::standard();
        for (name, overrides) in &self.fragments {
            match registry.get_mut(name) {
                Some(descriptor) => {
                    if let Some(source) = &overrides.source {
                        descriptor.source_path = source.clone();
                    }
                    if let Some(container) = &overrides.container {
                        descriptor.container_id = container.clone();
                    }
                    if overrides.fallback == Some(false) {
                        descriptor.fallback = None;
                    }
                }
                None => {
                    let source = overrides.source.clone().ok_or_else(|| ConfigError::InvalidValue {
                        key: format!("fragments.{name}.source"),
                        value: String::new(),
                    })?;
                    if overrides.fallback == Some(true) {
                        warn!(fragment = %name, "no fallback template available for custom fragment");
                    }
                    let mut descriptor = FragmentDescriptor::new(name.clone(), source);
                    if let Some(container) = &overrides.container {
                        descriptor = descriptor.with_container(container.clone());
                    }
                    registry.register(descriptor)?;
                }
            }
        }
        Ok(registry)
    }

    pub fn page_profiles(&self) -> PageProfiles {
        let mut profiles = PageProfiles::standard();
        for (page, fragments) in &self.pages {
            profiles.insert(page.clone(), fragments.iter().cloned());
        }
        profiles
    }

    pub fn page_settings(&self) -> PageSettings {
        PageSettings {
            notify_on_degraded: self.notifications.notify_on_degraded,
            notification_ttl: Duration::from_millis(self.notifications.ttl_ms),
        }
    }

    pub fn navigation_settings(&self) -> NavigationSettings {
        NavigationSettings {
            debounce: Duration::from_millis(self.navigation.debounce_ms),
            scroll_threshold: self.navigation.scroll_threshold_px,
            watchdog_interval: self.navigation.watchdog_interval_ms.map(Duration::from_millis),
            force_sync_poll: Duration::from_millis(self.navigation.force_sync_poll_ms),
            force_sync_attempts: self.navigation.force_sync_attempts,
            mobile_breakpoint: self.navigation.mobile_breakpoint_px,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.loader.request_timeout_ms)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
