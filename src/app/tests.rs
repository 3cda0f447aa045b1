//! End-to-end tests for site bootstrap and event handling.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::dashboard::{ACTUALITES_FIXTURE, FORMATIONS_FIXTURE};
    use crate::dom::{CTA_CONTAINER, FOOTER_CONTAINER, SIDEBAR_CONTAINER};
    use crate::testing::{StubSource, SIDEBAR_HTML};
    use crate::theme::StoreError;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Poisoned)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        fn remove(&self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    #[derive(Default)]
    struct Recorder {
        reports: StdMutex<Vec<String>>,
    }

    impl ErrorReporter for Recorder {
        fn report(&self, error: &anyhow::Error) {
            self.reports.lock().unwrap().push(format!("{error:#}"));
        }
    }

    fn site_with(source: StubSource) -> SiteBuilder {
        Site::builder(SiteConfig::default())
            .source(Arc::new(source))
            .store(Arc::new(MemoryStore::new()))
    }

    async fn active_hrefs(site: &Site) -> Vec<String> {
        site.document()
            .read()
            .await
            .active_links()
            .into_iter()
            .map(|l| l.href.clone())
            .collect()
    }

    #[tokio::test]
    async fn bootstrap_home_page() {
        let site = site_with(StubSource::site()).build().unwrap();
        let mut events = site.bus().subscribe();

        let report = site.bootstrap("index").await;

        assert!(report.is_clean());
        assert_eq!(report.theme, Some(Theme::Light));
        assert_eq!(report.pages.as_ref().unwrap().succeeded(), 3);
        let navigation = report.navigation.unwrap();
        assert_eq!(navigation.route, Some(Route::Home));
        assert_eq!(navigation.active_href.as_deref(), Some("/index.html"));
        assert!(navigation.breadcrumb_rendered);

        {
            let document = site.document().read().await;
            assert_eq!(document.content(SIDEBAR_CONTAINER), Some(SIDEBAR_HTML));
            assert!(!document.container(FOOTER_CONTAINER).unwrap().is_empty());
            assert!(!document.container(CTA_CONTAINER).unwrap().is_empty());
            assert_eq!(document.root_attribute("data-theme"), Some("clair"));
            assert!(document.status().is_none());
        }

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen.last(), Some(&AppEvent::ApplicationInitialized));
        assert!(seen.contains(&AppEvent::PageInitialized {
            page: "index".into()
        }));
    }

    #[tokio::test]
    async fn bootstrap_path_routes_and_marks_the_section() {
        let site = site_with(StubSource::site())
            .system_preferences(SystemPreferences::dark())
            .build()
            .unwrap();

        let report = site.bootstrap_path("/pages/formations/index.html").await;

        assert_eq!(report.page, "formations");
        assert_eq!(report.theme, Some(Theme::Dark));
        let navigation = report.navigation.unwrap();
        assert_eq!(navigation.route, Some(Route::Formations));
        assert_eq!(navigation.breadcrumb, ["Formations"]);
        assert_eq!(active_hrefs(&site).await, ["/pages/formations/index.html"]);
    }

    #[tokio::test]
    async fn theme_failure_is_reported_and_pages_still_load() {
        let recorder = Arc::new(Recorder::default());
        let site = site_with(StubSource::site())
            .store(Arc::new(BrokenStore))
            .reporter(recorder.clone())
            .build()
            .unwrap();

        let report = site.bootstrap("dashboard").await;

        assert!(!report.is_clean());
        assert!(report.theme.is_none());
        assert!(report.errors[0].starts_with("theme initialisation failed"));
        assert_eq!(report.pages.unwrap().succeeded(), 2);
        assert_eq!(
            site.document().read().await.status(),
            Some(BOOTSTRAP_ERROR_MESSAGE)
        );
        assert_eq!(recorder.reports.lock().unwrap().len(), 1);
        assert!(site.toggle_theme().await.is_err());
    }

    #[tokio::test]
    async fn theme_controls_after_bootstrap() {
        let site = site_with(StubSource::site()).build().unwrap();
        assert!(site.theme().await.is_none());
        site.bootstrap("index").await;

        assert_eq!(site.toggle_theme().await.unwrap(), Theme::Dark);
        assert_eq!(site.theme().await, Some(Theme::Dark));
        assert_eq!(site.set_theme("néon").await.unwrap(), None);
        assert_eq!(site.set_theme("clair").await.unwrap(), Some(Theme::Light));
        // explicit choice wins over the system
        assert_eq!(
            site.on_system_change(SystemPreferences::dark()).await.unwrap(),
            None
        );
        assert_eq!(site.theme().await, Some(Theme::Light));
    }

    #[tokio::test]
    async fn unknown_page_still_synchronises_navigation() {
        let site = site_with(StubSource::site()).build().unwrap();
        let report = site.bootstrap_path("/pages/inscription.html").await;

        assert_eq!(report.page, "inscription");
        assert!(report.pages.is_none());
        assert!(report.navigation.unwrap().breadcrumb_rendered);
    }

    #[test]
    fn page_for_path_resolution() {
        assert_eq!(page_for_path("/"), "index");
        assert_eq!(page_for_path("/index.html"), "index");
        assert_eq!(page_for_path("/pages/dashboard.html"), "dashboard");
        assert_eq!(page_for_path("/pages/actualites/rentree.html"), "actualites");
        assert_eq!(page_for_path("/pages/inscription.html"), "inscription");
        assert_eq!(page_for_path(""), "index");
    }

    #[tokio::test]
    async fn dashboard_reads_fixtures_through_the_source() {
        let source = StubSource::new()
            .with_body(
                FORMATIONS_FIXTURE,
                r#"[{"nom": "Génie Civil", "etudiants": 40}, {"nom": "Génie Informatique", "etudiants": 90}]"#,
            )
            .with_body(ACTUALITES_FIXTURE, r#"[{"titre": "Rentrée", "date": "2025-10-01"}]"#);
        let site = site_with(source).build().unwrap();

        let summary = site.dashboard().await.unwrap();
        assert_eq!(summary.total_formations, 2);
        assert_eq!(summary.total_students, 130);
        assert_eq!(summary.popular[0].name, "Génie Informatique");
        assert_eq!(summary.latest_news.len(), 1);
    }

    #[test]
    fn invalid_configuration_fails_to_build() {
        let config = SiteConfig {
            base_url: "::".into(),
            ..SiteConfig::default()
        };
        assert!(Site::builder(config).build().is_err());
    }

    #[tokio::test]
    async fn listeners_follow_system_changes_and_history() {
        let site = Arc::new(site_with(StubSource::site()).build().unwrap());
        site.bootstrap("index").await;
        let listeners = site.run_events();

        site.bus()
            .emit(AppEvent::SystemPreferenceChanged(SystemPreferences::dark()));
        site.bus().emit(AppEvent::HistoryNavigated {
            path: "/pages/contact.html".into(),
        });

        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let themed = site.theme().await == Some(Theme::Dark);
                let routed = active_hrefs(&site).await == ["/pages/contact.html"];
                if themed && routed {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();

        listeners.abort();
    }
}
