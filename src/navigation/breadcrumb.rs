//! Breadcrumb trail derived from the location path.

use crate::dom::markup::escape;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(html|php|aspx)$").expect("extension pattern"));

/// Technical path segments never shown as crumbs.
const NOISE_SEGMENTS: [&str; 6] = ["pages", "index.html", "html", "site_epl_web", "epl", "web"];

pub const ROOT_LABEL: &str = "Accueil";
pub const ROOT_HREF: &str = "/index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CrumbIcon {
    Home,
    Formations,
    Dashboard,
    Contact,
    About,
    News,
    Admissions,
    Generic,
}

impl CrumbIcon {
    fn for_segment(segment: &str) -> Self {
        match segment {
            "formations" => CrumbIcon::Formations,
            "dashboard" => CrumbIcon::Dashboard,
            "contact" => CrumbIcon::Contact,
            "about" => CrumbIcon::About,
            "actualites" => CrumbIcon::News,
            "admissions" => CrumbIcon::Admissions,
            _ => CrumbIcon::Generic,
        }
    }

    pub fn svg(self) -> &'static str {
        match self {
            CrumbIcon::Home => {
                r#"<path d="M3 9l9-7 9 7v11a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2z"/><polyline points="9 22 9 12 15 12 15 22"/>"#
            }
            CrumbIcon::Formations => concat!(
                r#"<path d="M4 19.5A2.5 2.5 0 0 1 6.5 17H20"/>"#,
                r#"<path d="M6.5 2H20v20H6.5A2.5 2.5 0 0 1 4 19.5v-15A2.5 2.5 0 0 1 6.5 2z"/>"#,
                r#"<path d="M8 7h8"/><path d="M8 11h8"/><path d="M8 15h4"/>"#
            ),
            CrumbIcon::Dashboard => concat!(
                r#"<rect x="3" y="3" width="7" height="7"/><rect x="14" y="3" width="7" height="7"/>"#,
                r#"<rect x="14" y="14" width="7" height="7"/><rect x="3" y="14" width="7" height="7"/>"#
            ),
            CrumbIcon::Contact => concat!(
                r#"<path d="M4 4h16c1.1 0 2 .9 2 2v12c0 1.1-.9 2-2 2H4c-1.1 0-2-.9-2-2V6c0-1.1.9-2 2-2z"/>"#,
                r#"<polyline points="22,6 12,13 2,6"/>"#
            ),
            CrumbIcon::About => {
                r#"<path d="M22 10v6M2 10l10-5 10 5-10 5z"/><path d="M6 12v5c3 3 9 3 12 0v-5"/>"#
            }
            CrumbIcon::News => concat!(
                r#"<path d="M4 4h16c1.1 0 2 .9 2 2v12c0 1.1-.9 2-2 2H4c-1.1 0-2-.9-2-2V6c0-1.1.9-2 2-2z"/>"#,
                r#"<path d="M8 6h8M8 10h8M8 14h5"/><path d="M4 2h4v4H4z"/><path d="M5 3h2v2H5z"/>"#
            ),
            CrumbIcon::Admissions => concat!(
                r#"<path d="M20 21v-2a4 4 0 0 0-4-4H8a4 4 0 0 0-4 4v2"/><circle cx="12" cy="7" r="4"/>"#,
                r#"<path d="M18 6l4 4-4 4"/><path d="M22 10H10"/><path d="M18 6l2 2"/>"#
            ),
            CrumbIcon::Generic => r#"<circle cx="12" cy="12" r="10"/><path d="M12 6v6l4 2"/>"#,
        }
    }

    fn render(self) -> String {
        format!(
            r#"<svg class="breadcrumb-icone" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2">{}</svg>"#,
            self.svg()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub label: String,
    /// `None` for the current location.
    pub href: Option<String>,
    pub icon: CrumbIcon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    root: Crumb,
    segments: Vec<Crumb>,
}

impl Breadcrumb {
    pub fn from_path(path: &str) -> Self {
        let cleaned: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty() && !NOISE_SEGMENTS.contains(s))
            .map(|s| EXTENSION.replace(s, "").into_owned())
            .filter(|s| !s.is_empty())
            .collect();

        let last = cleaned.len().saturating_sub(1);
        let segments = cleaned
            .iter()
            .enumerate()
            .map(|(index, segment)| Crumb {
                label: label_for(segment),
                href: (index != last).then(|| canonical_url(segment)),
                icon: CrumbIcon::for_segment(segment),
            })
            .collect();

        Self {
            root: Crumb {
                label: ROOT_LABEL.to_string(),
                href: Some(ROOT_HREF.to_string()),
                icon: CrumbIcon::Home,
            },
            segments,
        }
    }

    pub fn root(&self) -> &Crumb {
        &self.root
    }

    /// Crumbs after the root.
    pub fn segments(&self) -> &[Crumb] {
        &self.segments
    }

    pub fn labels(&self) -> Vec<&str> {
        self.segments.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn render(&self) -> String {
        let items: String = std::iter::once(&self.root)
            .chain(&self.segments)
            .map(render_crumb)
            .collect();
        format!(
            r#"<nav class="breadcrumb-conteneur" aria-label="Fil d'Ariane"><ol class="breadcrumb-liste">{items}</ol></nav>"#
        )
    }
}

fn render_crumb(crumb: &Crumb) -> String {
    let inner = format!(
        r#"{}<span class="breadcrumb-texte">{}</span>"#,
        crumb.icon.render(),
        escape(&crumb.label)
    );
    match &crumb.href {
        Some(href) => format!(
            r#"<li class="breadcrumb-item"><a href="{}" class="breadcrumb-lien">{inner}</a></li>"#,
            escape(href)
        ),
        None => format!(
            r#"<li class="breadcrumb-item"><span class="breadcrumb-actuel" aria-current="page">{inner}</span></li>"#
        ),
    }
}

pub fn label_for(segment: &str) -> String {
    match segment {
        "formations" => "Formations".to_string(),
        "dashboard" => "Tableau de bord".to_string(),
        "contact" => "Contact".to_string(),
        "about" => "À propos".to_string(),
        "actualites" => "Actualités".to_string(),
        "admissions" => "Admissions".to_string(),
        "admin" => "Administration".to_string(),
        "profil" => "Profil".to_string(),
        "parametres" => "Paramètres".to_string(),
        other => capitalize(other),
    }
}

pub fn canonical_url(segment: &str) -> String {
    match segment {
        "formations" => "/pages/formations/index.html".to_string(),
        "dashboard" => "/pages/dashboard.html".to_string(),
        "contact" => "/pages/contact.html".to_string(),
        "about" => "/pages/about.html".to_string(),
        "actualites" => "/pages/actualites.html".to_string(),
        "admissions" => "/pages/admissions.html".to_string(),
        other => format!("/{other}"),
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
