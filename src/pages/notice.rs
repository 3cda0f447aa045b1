//! Loading placeholders and the degraded-mode notification.

use crate::dom::markup::escape;
use crate::dom::Notification;

pub const DEGRADED_TITLE: &str = "Erreur de chargement";
pub const DEGRADED_MESSAGE: &str =
    "Certains composants n'ont pas pu être chargés. La page fonctionne en mode dégradé.";

pub fn loading_message(fragment: &str) -> String {
    match fragment {
        "sidebar" => "Chargement de la navigation...".to_string(),
        "footer" => "Chargement du pied de page...".to_string(),
        "cta" => "Chargement des actions...".to_string(),
        other => format!("Chargement de {other}..."),
    }
}

pub fn placeholder_markup(fragment: &str) -> String {
    format!(
        concat!(
            r#"<div class="indicateur-chargement" data-composant="{name}">"#,
            r#"<div class="indicateur-chargement-spinner"></div>"#,
            r#"<p class="indicateur-chargement-texte">{message}</p>"#,
            r#"</div>"#
        ),
        name = escape(fragment),
        message = escape(&loading_message(fragment)),
    )
}

pub fn degraded_mode() -> Notification {
    Notification::new(DEGRADED_TITLE, DEGRADED_MESSAGE)
}
