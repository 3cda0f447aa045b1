use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page id → fragments that page mounts, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageProfiles {
    profiles: BTreeMap<String, Vec<String>>,
}

impl PageProfiles {
    pub fn empty() -> Self {
        Self {
            profiles: BTreeMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut profiles = Self::empty();
        profiles.insert("index", ["sidebar", "footer", "cta"]);
        profiles.insert("dashboard", ["sidebar", "footer"]);
        profiles.insert("formations", ["sidebar", "footer", "cta"]);
        profiles.insert("contact", ["sidebar", "footer"]);
        profiles.insert("about", ["sidebar", "footer"]);
        profiles
    }

    /// Replaces any existing profile for `page`.
    pub fn insert<I, S>(&mut self, page: impl Into<String>, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.profiles
            .insert(page.into(), fragments.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, page: &str) -> Option<&[String]> {
        self.profiles
            .get(page)
            .map(Vec::as_slice)
            .filter(|fragments| !fragments.is_empty())
    }

    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.profiles
            .iter()
            .map(|(page, fragments)| (page.as_str(), fragments.as_slice()))
    }
}

impl Default for PageProfiles {
    fn default() -> Self {
        Self::standard()
    }
}
