//! Tests for theme resolution and preference stores.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::dom::{self, Document};
    use crate::events::{AppEvent, EventBus};
    use std::sync::Arc;

    async fn manager_with(
        store: Arc<dyn PreferenceStore>,
        system: SystemPreferences,
    ) -> (ThemeManager, crate::dom::SharedDocument, EventBus) {
        let document = dom::shared(Document::standard_shell("/"));
        let bus = EventBus::new();
        let manager = ThemeManager::initialize(
            store,
            THEME_STORAGE_KEY,
            system,
            Arc::clone(&document),
            bus.clone(),
        )
        .await
        .unwrap();
        (manager, document, bus)
    }

    #[test]
    fn system_preference_resolution() {
        assert_eq!(SystemPreferences::default().resolve(), Theme::Light);
        assert_eq!(SystemPreferences::dark().resolve(), Theme::Dark);
        let contrast = SystemPreferences {
            prefers_dark: true,
            prefers_high_contrast: true,
        };
        assert_eq!(contrast.resolve(), Theme::Light);
    }

    #[test]
    fn theme_names_round_trip_and_rotate() {
        assert_eq!(Theme::parse("sombre"), Some(Theme::Dark));
        assert_eq!(Theme::parse("clair"), Some(Theme::Light));
        assert_eq!(Theme::parse("dark"), None);
        assert_eq!(Theme::Light.next(), Theme::Dark);
        assert_eq!(Theme::Dark.next(), Theme::Light);
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"sombre\"");
    }

    #[tokio::test]
    async fn dark_system_without_stored_choice_starts_dark_and_persists_nothing() {
        let store = Arc::new(MemoryStore::new());
        let (manager, document, _bus) = manager_with(store.clone(), SystemPreferences::dark()).await;

        assert_eq!(manager.current(), Theme::Dark);
        assert_eq!(document.read().await.root_attribute("data-theme"), Some("sombre"));
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn stored_choice_wins_over_system() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_STORAGE_KEY, "clair").unwrap();
        let (manager, _document, _bus) = manager_with(store, SystemPreferences::dark()).await;
        assert_eq!(manager.current(), Theme::Light);
    }

    #[tokio::test]
    async fn unsupported_stored_value_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(THEME_STORAGE_KEY, "violet").unwrap();
        let (manager, _document, _bus) = manager_with(store, SystemPreferences::dark()).await;
        assert_eq!(manager.current(), Theme::Dark);
    }

    #[tokio::test]
    async fn toggle_twice_returns_to_start_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let (mut manager, document, bus) = manager_with(store.clone(), SystemPreferences::default()).await;
        let mut events = bus.subscribe();
        let start = manager.current();

        assert_eq!(manager.toggle_theme().await.unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("sombre"));
        assert!(matches!(
            events.recv().await.unwrap(),
            AppEvent::ThemeChanged { theme: Theme::Dark, .. }
        ));

        assert_eq!(manager.toggle_theme().await.unwrap(), start);
        assert_eq!(document.read().await.root_attribute("data-theme"), Some(start.as_str()));
    }

    #[tokio::test]
    async fn set_theme_rejects_unknown_names() {
        let store = Arc::new(MemoryStore::new());
        let (mut manager, _document, _bus) = manager_with(store.clone(), SystemPreferences::default()).await;

        assert_eq!(manager.set_theme("neon").await.unwrap(), None);
        assert_eq!(manager.current(), Theme::Light);
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap(), None);

        assert_eq!(manager.set_theme("sombre").await.unwrap(), Some(Theme::Dark));
        assert!(manager.is_supported("clair"));
        assert!(!manager.is_supported("neon"));
        assert_eq!(manager.available(), vec![Theme::Light, Theme::Dark]);
    }

    #[tokio::test]
    async fn system_change_applies_only_without_explicit_choice() {
        let store = Arc::new(MemoryStore::new());
        let (mut manager, _document, _bus) = manager_with(store, SystemPreferences::default()).await;

        assert_eq!(
            manager.on_system_change(SystemPreferences::dark()).await.unwrap(),
            Some(Theme::Dark)
        );
        manager.set_theme("clair").await.unwrap();
        assert_eq!(
            manager.on_system_change(SystemPreferences::dark()).await.unwrap(),
            None
        );
        assert_eq!(manager.current(), Theme::Light);

        assert_eq!(manager.reset().await.unwrap(), Theme::Dark);
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("store.json");

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap(), None);
        store.set(THEME_STORAGE_KEY, "sombre").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("sombre"));
        reopened.remove(THEME_STORAGE_KEY).unwrap();
        assert_eq!(FileStore::open(&path).unwrap().get(THEME_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_keeps_memory_unchanged_when_the_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::open(&path).unwrap();
        store.set(THEME_STORAGE_KEY, "clair").unwrap();

        // a directory in place of the file makes every write fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            store.set(THEME_STORAGE_KEY, "sombre"),
            Err(StoreError::Io { .. })
        ));
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("clair"));
        assert!(store.set("autre", "valeur").is_err());
        assert_eq!(store.get("autre").unwrap(), None);

        assert!(store.remove(THEME_STORAGE_KEY).is_err());
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("clair"));
    }

    #[test]
    fn file_store_rejects_malformed_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "not json").unwrap();
        assert!(matches!(
            FileStore::open(file.path()),
            Err(StoreError::Malformed { .. })
        ));
    }
}
