use serde::Serialize;
use std::fmt;

/// Classification of the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    Home,
    Formations,
    Dashboard,
    Contact,
    About,
    News,
    Admissions,
}

impl Route {
    /// Substring-matched routes in priority order. Home is matched exactly.
    const CONTAINED: [Route; 6] = [
        Route::Formations,
        Route::Dashboard,
        Route::Contact,
        Route::About,
        Route::News,
        Route::Admissions,
    ];

    /// `None` when the path matches no known route.
    pub fn classify(path: &str) -> Option<Self> {
        if is_home(path) {
            return Some(Route::Home);
        }
        Self::CONTAINED
            .into_iter()
            .find(|route| path.contains(route.pattern()))
    }

    pub fn pattern(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Formations => "formations",
            Route::Dashboard => "dashboard",
            Route::Contact => "contact",
            Route::About => "about",
            Route::News => "actualites",
            Route::Admissions => "admissions",
        }
    }

    /// Page profile id for this route.
    pub fn page_id(self) -> &'static str {
        match self {
            Route::Home => "index",
            other => other.pattern(),
        }
    }

    /// Whether a navigation link pointing at `href` represents this route.
    pub fn matches_href(self, href: &str) -> bool {
        match self {
            Route::Home => is_home(href),
            other => href.contains(other.pattern()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.page_id())
    }
}

pub fn is_home(path: &str) -> bool {
    path == "/" || path == "/index.html"
}

/// Last non-empty `/`-separated segment.
pub fn last_segment(path: &str) -> Option<&str> {
    path.split('/').filter(|s| !s.is_empty()).last()
}
