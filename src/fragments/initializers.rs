//! Post-mount behaviour per fragment, scoped to the mounted subtree.

use crate::dom::markup::count_class;
use crate::dom::{Binding, BindingAction};

const CONTACT_PAGE: &str = "/pages/contact.html";
const PRESS_SCALE: f32 = 0.95;
const PRESS_DURATION_MS: u64 = 150;
const LOADING_TEXT: &str = "Chargement...";
const LOADING_RESTORE_MS: u64 = 1000;

/// Bindings for `fragment` given its freshly mounted markup. Selectors that
/// match nothing are omitted.
pub fn bind(fragment: &str, markup: &str) -> Vec<Binding> {
    let rules: Vec<(&str, BindingAction)> = match fragment {
        "sidebar" => vec![
            (
                "sidebar-lien-navigation",
                BindingAction::LoadingFeedback {
                    text: LOADING_TEXT.to_string(),
                    restore_after_ms: LOADING_RESTORE_MS,
                },
            ),
            (
                "sidebar-aide-bouton",
                BindingAction::Navigate {
                    href: CONTACT_PAGE.to_string(),
                },
            ),
        ],
        "footer" => vec![("footer-link", press_effect())],
        "cta" => vec![("bouton", press_effect())],
        _ => Vec::new(),
    };

    rules
        .into_iter()
        .filter_map(|(class, action)| {
            let matches = count_class(markup, class);
            (matches > 0).then(|| Binding {
                selector: format!(".{class}"),
                matches,
                action,
            })
        })
        .collect()
}

fn press_effect() -> BindingAction {
    BindingAction::PressEffect {
        scale: PRESS_SCALE,
        duration_ms: PRESS_DURATION_MS,
    }
}
