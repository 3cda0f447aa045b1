//! Shared fixtures for unit tests.

use crate::dom::{self, Document, SharedDocument};
use crate::fragments::{Accept, FetchError, FragmentLoader, FragmentRegistry, FragmentSource};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) const SIDEBAR_HTML: &str = concat!(
    r#"<aside class="sidebar"><nav class="sidebar-navigation">"#,
    r#"<a href="/index.html" class="sidebar-lien-navigation">Accueil</a>"#,
    r#"<a href="/pages/formations/index.html" class="sidebar-lien-navigation">Formations</a>"#,
    r#"<a href="/pages/dashboard.html" class="sidebar-lien-navigation">Tableau de bord</a>"#,
    r#"<a href="/pages/contact.html" class="sidebar-lien-navigation">Contact</a>"#,
    r#"</nav><button class="sidebar-aide-bouton">Aide</button></aside>"#
);
pub(crate) const FOOTER_HTML: &str =
    r#"<footer><a href="/pages/about.html" class="footer-link">À propos</a></footer>"#;
pub(crate) const CTA_HTML: &str =
    r#"<section class="cta"><a href="/pages/inscription.html" class="bouton bouton-primaire">Candidater</a></section>"#;

#[derive(Clone)]
pub(crate) enum Reply {
    Body(String),
    Status(u16),
    Delayed(Duration, Box<Reply>),
    Panic,
}

/// Scripted source: a reply per path and a call counter.
#[derive(Default)]
pub(crate) struct StubSource {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sidebar, footer and CTA served with the sample markup.
    pub(crate) fn site() -> Self {
        Self::new()
            .with_body("/components/sidebar.html", SIDEBAR_HTML)
            .with_body("/components/footer.html", FOOTER_HTML)
            .with_body("/components/cta.html", CTA_HTML)
    }

    pub(crate) fn with_reply(self, path: &str, reply: Reply) -> Self {
        self.set(path, reply);
        self
    }

    pub(crate) fn with_body(self, path: &str, body: &str) -> Self {
        self.with_reply(path, Reply::Body(body.to_string()))
    }

    pub(crate) fn with_status(self, path: &str, status: u16) -> Self {
        self.with_reply(path, Reply::Status(status))
    }

    pub(crate) fn with_delay(self, path: &str, delay: Duration, body: &str) -> Self {
        self.with_reply(path, Reply::Delayed(delay, Box::new(Reply::Body(body.to_string()))))
    }

    pub(crate) fn set(&self, path: &str, reply: Reply) {
        self.replies.lock().unwrap().insert(path.to_string(), reply);
    }

    pub(crate) fn calls(&self, path: &str) -> usize {
        self.calls.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl FragmentSource for StubSource {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn fetch(&self, path: &str, _accept: Accept) -> Result<String, FetchError> {
        *self.calls.lock().unwrap().entry(path.to_string()).or_default() += 1;
        let mut reply = self.replies.lock().unwrap().get(path).cloned();
        loop {
            match reply {
                None => return Err(FetchError::NotFound(path.to_string())),
                Some(Reply::Body(body)) => return crate::fragments::sources::ensure_non_empty(path, body),
                Some(Reply::Status(status)) => {
                    return Err(FetchError::Status {
                        path: path.to_string(),
                        status,
                    })
                }
                Some(Reply::Delayed(delay, inner)) => {
                    tokio::time::sleep(delay).await;
                    reply = Some(*inner);
                }
                Some(Reply::Panic) => panic!("scripted panic for {path}"),
            }
        }
    }
}

pub(crate) fn shell(location: &str) -> SharedDocument {
    dom::shared(Document::standard_shell(location))
}

pub(crate) fn loader(source: Arc<StubSource>, document: SharedDocument) -> Arc<FragmentLoader> {
    Arc::new(FragmentLoader::new(
        FragmentRegistry::standard(),
        source,
        document,
        8,
    ))
}
