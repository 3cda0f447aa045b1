//! Tests for the fragment registry, loader and initializers.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::dom::{BindingAction, ContentOrigin, BREADCRUMB_CONTAINER, CTA_CONTAINER, FOOTER_CONTAINER, SIDEBAR_CONTAINER};
    use crate::events::{AppEvent, EventBus};
    use crate::testing::{self, StubSource, SIDEBAR_HTML};
    use std::sync::Arc;

    const SIDEBAR_PATH: &str = "/components/sidebar.html";

    #[test]
    fn registry_rejects_duplicates_and_empty_names() {
        let mut registry = FragmentRegistry::standard();
        assert_eq!(registry.len(), 4);
        assert_eq!(
            registry.register(FragmentDescriptor::new("sidebar", "/x.html")),
            Err(RegistryError::Duplicate("sidebar".into()))
        );
        assert_eq!(
            registry.register(FragmentDescriptor::new(" ", "/x.html")),
            Err(RegistryError::EmptyName)
        );
        registry
            .register(FragmentDescriptor::new("hero", "/components/hero.html"))
            .unwrap();
        assert_eq!(registry.get("hero").unwrap().container_id, "hero-container");
        assert!(registry.get("breadcrumb").unwrap().fallback.is_none());
    }

    #[test]
    fn sidebar_fallback_lists_simplified_navigation() {
        let template = FragmentTemplate::sidebar();
        let hrefs: Vec<&str> = template.links().iter().map(|l| l.href.as_str()).collect();
        assert_eq!(
            hrefs,
            ["/index.html", "/pages/formations/index.html", "/pages/contact.html"]
        );

        let rendered = template.render();
        let anchors = crate::dom::markup::anchors(&rendered);
        assert_eq!(anchors.len(), 3);
        assert!(anchors.iter().all(|a| a.classes.contains("sidebar-lien-navigation")));
        assert_eq!(anchors[0].text, "Accueil");
    }

    #[test]
    fn templates_escape_their_text() {
        let template = FragmentTemplate::Footer {
            copyright: "<b>EPL</b> & co".into(),
        };
        assert!(template.render().contains("&lt;b&gt;EPL&lt;/b&gt; &amp; co"));
        assert!(FragmentTemplate::footer().links().is_empty());
        assert_eq!(
            crate::dom::markup::count_class(&FragmentTemplate::call_to_action().render(), "bouton"),
            1
        );
    }

    #[test]
    fn initializers_bind_only_present_selectors() {
        let bindings = initializers::bind("sidebar", SIDEBAR_HTML);
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].selector, ".sidebar-lien-navigation");
        assert_eq!(bindings[0].matches, 4);
        assert_eq!(
            bindings[1].action,
            BindingAction::Navigate {
                href: "/pages/contact.html".into()
            }
        );

        let fallback = initializers::bind("sidebar", &FragmentTemplate::sidebar().render());
        assert_eq!(fallback.len(), 1);
        assert!(initializers::bind("breadcrumb", "<a class=\"bouton\">x</a>").is_empty());
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let source = Arc::new(StubSource::site());
        let document = testing::shell("/");
        let loader = testing::loader(Arc::clone(&source), Arc::clone(&document));

        let first = loader
            .load_detailed("sidebar", SIDEBAR_CONTAINER, LoadOptions::default())
            .await;
        let second = loader
            .load_detailed("sidebar", SIDEBAR_CONTAINER, LoadOptions::default())
            .await;

        assert_eq!(first.outcome, LoadOutcome::Network);
        assert_eq!(second.outcome, LoadOutcome::Cache);
        assert_eq!(source.calls(SIDEBAR_PATH), 1);
        assert_eq!(loader.cached("sidebar").await.as_deref(), Some(SIDEBAR_HTML));

        let document = document.read().await;
        let container = document.container(SIDEBAR_CONTAINER).unwrap();
        assert_eq!(container.markup, SIDEBAR_HTML);
        assert_eq!(container.origin, Some(ContentOrigin::Cache));
        assert_eq!(container.bindings.len(), 2);
    }

    #[tokio::test]
    async fn forced_reload_goes_back_to_the_network() {
        let source = Arc::new(StubSource::site());
        let loader = testing::loader(Arc::clone(&source), testing::shell("/"));

        assert!(loader.load("footer", FOOTER_CONTAINER, LoadOptions::default()).await);
        assert!(loader.load("footer", FOOTER_CONTAINER, LoadOptions::forced()).await);
        assert_eq!(source.calls("/components/footer.html"), 2);
    }

    #[tokio::test]
    async fn failed_fetch_mounts_the_rendered_fallback() {
        let source = Arc::new(StubSource::new().with_status(SIDEBAR_PATH, 500));
        let document = testing::shell("/");
        let loader = testing::loader(Arc::clone(&source), Arc::clone(&document));

        let result = loader
            .load_detailed("sidebar", SIDEBAR_CONTAINER, LoadOptions::default())
            .await;

        assert!(result.success());
        assert!(result.degraded());
        assert_eq!(
            document.read().await.content(SIDEBAR_CONTAINER),
            Some(FragmentTemplate::sidebar().render().as_str())
        );
        assert_eq!(loader.cache_len().await, 0);
    }

    #[tokio::test]
    async fn blank_body_counts_as_failure() {
        let source = Arc::new(StubSource::new().with_body("/components/cta.html", "  \n "));
        let document = testing::shell("/");
        let loader = testing::loader(source, Arc::clone(&document));

        let result = loader
            .load_detailed("cta", CTA_CONTAINER, LoadOptions::default())
            .await;
        assert_eq!(result.outcome, LoadOutcome::Fallback);
        assert_eq!(loader.cached("cta").await, None);
        assert_eq!(
            document.read().await.container(CTA_CONTAINER).unwrap().origin,
            Some(ContentOrigin::Fallback)
        );
    }

    #[tokio::test]
    async fn failure_without_fallback_leaves_container_untouched() {
        let source = Arc::new(StubSource::new().with_status("/components/breadcrumb.html", 404));
        let document = testing::shell("/");
        document
            .write()
            .await
            .mount(BREADCRUMB_CONTAINER, "<p>previous</p>".into(), ContentOrigin::Generated, Vec::new())
            .unwrap();
        let loader = testing::loader(source, Arc::clone(&document));

        let result = loader
            .load_detailed("breadcrumb", BREADCRUMB_CONTAINER, LoadOptions::default())
            .await;

        assert_eq!(result.outcome, LoadOutcome::Failed);
        assert!(result.error.unwrap().contains("404"));
        assert_eq!(document.read().await.content(BREADCRUMB_CONTAINER), Some("<p>previous</p>"));
    }

    #[tokio::test]
    async fn caller_errors_never_reach_the_network() {
        let source = Arc::new(StubSource::site());
        let loader = testing::loader(Arc::clone(&source), testing::shell("/"));

        assert!(!loader.load("unknown", SIDEBAR_CONTAINER, LoadOptions::default()).await);
        let missing = loader
            .load_detailed("sidebar", "nowhere", LoadOptions::default())
            .await;
        assert_eq!(missing.outcome, LoadOutcome::Failed);
        assert_eq!(source.total_calls(), 0);
    }

    #[tokio::test]
    async fn clear_cache_keeps_rendered_content() {
        let source = Arc::new(StubSource::site());
        let document = testing::shell("/");
        let loader = testing::loader(Arc::clone(&source), Arc::clone(&document));

        loader.load("sidebar", SIDEBAR_CONTAINER, LoadOptions::default()).await;
        loader.clear_cache().await;
        assert_eq!(loader.cache_len().await, 0);
        assert_eq!(document.read().await.content(SIDEBAR_CONTAINER), Some(SIDEBAR_HTML));

        loader.load("sidebar", SIDEBAR_CONTAINER, LoadOptions::default()).await;
        assert_eq!(source.calls(SIDEBAR_PATH), 2);
    }

    #[tokio::test]
    async fn cache_never_evicts_registered_fragments() {
        let source = Arc::new(StubSource::site());
        let document = testing::shell("/");
        let loader = FragmentLoader::new(
            FragmentRegistry::standard(),
            source.clone(),
            document,
            1,
        );

        for (name, container) in [
            ("sidebar", SIDEBAR_CONTAINER),
            ("footer", FOOTER_CONTAINER),
            ("cta", CTA_CONTAINER),
        ] {
            assert!(loader.load(name, container, LoadOptions::default()).await);
        }
        assert_eq!(loader.cache_len().await, 3);
        assert!(loader.cached("sidebar").await.is_some());
    }

    #[tokio::test]
    async fn load_many_preserves_request_order() {
        let source = Arc::new(StubSource::site());
        let loader = testing::loader(source, testing::shell("/"));

        let results = loader
            .load_many(&[
                LoadRequest::new("cta", CTA_CONTAINER),
                LoadRequest::new("missing", FOOTER_CONTAINER),
                LoadRequest::new("sidebar", SIDEBAR_CONTAINER).with_options(LoadOptions::forced()),
            ])
            .await;

        let outcomes: Vec<(&str, LoadOutcome)> = results
            .iter()
            .map(|r| (r.fragment.as_str(), r.outcome))
            .collect();
        assert_eq!(
            outcomes,
            [
                ("cta", LoadOutcome::Network),
                ("missing", LoadOutcome::Failed),
                ("sidebar", LoadOutcome::Network),
            ]
        );
    }

    #[tokio::test]
    async fn mounts_are_announced_on_the_bus() {
        let bus = EventBus::new();
        let mut events = bus.subscribe();
        let loader = FragmentLoader::new(
            FragmentRegistry::standard(),
            Arc::new(StubSource::new()),
            testing::shell("/"),
            8,
        )
        .with_events(bus);

        assert!(loader.load("footer", FOOTER_CONTAINER, LoadOptions::default()).await);
        assert_eq!(
            events.recv().await.unwrap(),
            AppEvent::FragmentMounted {
                fragment: "footer".into(),
                container_id: FOOTER_CONTAINER.into(),
                origin: ContentOrigin::Fallback,
            }
        );
    }
}
