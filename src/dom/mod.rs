//! In-memory page model: containers addressed by id, navigation links,
//! root attributes, notifications and the accessible status region.
//!
//! Fragments are mounted into containers as raw markup. Links and
//! class-based interaction bindings are extracted from that markup at mount
//! time so navigation state can be reflected without a full HTML tree.

pub mod document;
pub mod markup;

pub use document::{
    Binding, BindingAction, Container, ContentOrigin, Document, DocumentSnapshot, DomError, Link,
    Notification, SharedDocument, ACTIVE_CLASS,
};

use std::sync::Arc;
use tokio::sync::RwLock;

pub const SIDEBAR_CONTAINER: &str = "sidebar-container";
pub const FOOTER_CONTAINER: &str = "footer-container";
pub const CTA_CONTAINER: &str = "cta-container";
pub const BREADCRUMB_CONTAINER: &str = "breadcrumb-container";

/// Wrap a document for sharing between the loader, the orchestrator and
/// the navigation sync.
pub fn shared(document: Document) -> SharedDocument {
    Arc::new(RwLock::new(document))
}
