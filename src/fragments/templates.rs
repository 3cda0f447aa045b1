//! Typed fallback content, rendered to markup only when it is mounted.

use crate::dom::markup::escape;

const SIDEBAR_LOGO: &str = r#"<svg class="sidebar-logo-icone" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2"><path d="M22 10v6M2 10l10-5 10 5-10 5z"/><path d="M6 12v5c3 3 9 3 12 0v-5"/></svg>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLink {
    pub href: String,
    pub label: String,
}

impl TemplateLink {
    pub fn new(href: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentTemplate {
    Sidebar {
        brand_title: String,
        brand_subtitle: String,
        links: Vec<TemplateLink>,
        help_text: String,
    },
    Footer {
        copyright: String,
    },
    CallToAction {
        title: String,
        description: String,
        actions: Vec<TemplateLink>,
    },
}

impl FragmentTemplate {
    /// Simplified navigation: home, formations, contact.
    pub fn sidebar() -> Self {
        FragmentTemplate::Sidebar {
            brand_title: "EPL".into(),
            brand_subtitle: "École Polytechnique".into(),
            links: vec![
                TemplateLink::new("/index.html", "Accueil"),
                TemplateLink::new("/pages/formations/index.html", "Formations"),
                TemplateLink::new("/pages/contact.html", "Contact"),
            ],
            help_text: "Navigation simplifiée disponible".into(),
        }
    }

    pub fn footer() -> Self {
        FragmentTemplate::Footer {
            copyright: "© 2025 École Polytechnique de Lomé. Tous droits réservés.".into(),
        }
    }

    pub fn call_to_action() -> Self {
        FragmentTemplate::CallToAction {
            title: "Prêt à rejoindre l'excellence ?".into(),
            description:
                "Découvrez nos formations et commencez votre parcours d'ingénieur.".into(),
            actions: vec![TemplateLink::new(
                "/pages/formations/index.html",
                "Découvrir nos formations",
            )],
        }
    }

    pub fn links(&self) -> &[TemplateLink] {
        match self {
            FragmentTemplate::Sidebar { links, .. } => links,
            FragmentTemplate::CallToAction { actions, .. } => actions,
            FragmentTemplate::Footer { .. } => &[],
        }
    }

    pub fn render(&self) -> String {
        match self {
            FragmentTemplate::Sidebar {
                brand_title,
                brand_subtitle,
                links,
                help_text,
            } => {
                let nav: String = links
                    .iter()
                    .map(|link| {
                        format!(
                            r#"<a href="{}" class="sidebar-lien-navigation"><span class="sidebar-texte-navigation">{}</span></a>"#,
                            escape(&link.href),
                            escape(&link.label)
                        )
                    })
                    .collect();
                format!(
                    concat!(
                        r#"<aside class="sidebar sidebar-fallback" role="navigation">"#,
                        r#"<div class="sidebar-en-tete"><div class="sidebar-logo-conteneur">"#,
                        r#"<div class="sidebar-logo-cercle">{logo}</div>"#,
                        r#"<div class="sidebar-logo-texte"><div class="sidebar-logo-titre">{title}</div>"#,
                        r#"<div class="sidebar-logo-sous-titre">{subtitle}</div></div>"#,
                        r#"</div></div>"#,
                        r#"<nav class="sidebar-navigation">{nav}</nav>"#,
                        r#"<div class="sidebar-aide"><p>{help}</p></div>"#,
                        r#"</aside>"#
                    ),
                    logo = SIDEBAR_LOGO,
                    title = escape(brand_title),
                    subtitle = escape(brand_subtitle),
                    nav = nav,
                    help = escape(help_text),
                )
            }
            FragmentTemplate::Footer { copyright } => format!(
                concat!(
                    r#"<footer class="footer-principal footer-fallback"><div class="container">"#,
                    r#"<div class="footer-bottom"><div class="footer-copyright"><p>{}</p></div></div>"#,
                    r#"</div></footer>"#
                ),
                escape(copyright)
            ),
            FragmentTemplate::CallToAction {
                title,
                description,
                actions,
            } => {
                let buttons: String = actions
                    .iter()
                    .map(|action| {
                        format!(
                            r#"<a href="{}" class="bouton bouton-primaire">{}</a>"#,
                            escape(&action.href),
                            escape(&action.label)
                        )
                    })
                    .collect();
                format!(
                    concat!(
                        r#"<section class="cta-section cta-fallback"><div class="container"><div class="cta-contenu">"#,
                        r#"<h2 class="cta-titre">{}</h2><p class="cta-description">{}</p>"#,
                        r#"<div class="cta-actions">{}</div>"#,
                        r#"</div></div></section>"#
                    ),
                    escape(title),
                    escape(description),
                    buttons
                )
            }
        }
    }
}
