//! Static description of the fragments a site knows about.

use super::templates::FragmentTemplate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Fragment \"{0}\" is already registered")]
    Duplicate(String),
    #[error("Fragment name must not be empty")]
    EmptyName,
}

/// `sidebar` → `sidebar-container`.
pub fn container_id_for(name: &str) -> String {
    format!("{name}-container")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDescriptor {
    pub name: String,
    pub source_path: String,
    pub container_id: String,
    pub fallback: Option<FragmentTemplate>,
}

impl FragmentDescriptor {
    pub fn new(name: impl Into<String>, source_path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            container_id: container_id_for(&name),
            name,
            source_path: source_path.into(),
            fallback: None,
        }
    }

    pub fn with_container(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    pub fn with_fallback(mut self, template: FragmentTemplate) -> Self {
        self.fallback = Some(template);
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback = None;
        self
    }
}

/// Ordered set of descriptors with unique names.
#[derive(Debug, Clone, Default)]
pub struct FragmentRegistry {
    fragments: Vec<FragmentDescriptor>,
}

impl FragmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// sidebar, footer and CTA with fallbacks; breadcrumb without.
    pub fn standard() -> Self {
        Self {
            fragments: vec![
                FragmentDescriptor::new("sidebar", "/components/sidebar.html")
                    .with_fallback(FragmentTemplate::sidebar()),
                FragmentDescriptor::new("footer", "/components/footer.html")
                    .with_fallback(FragmentTemplate::footer()),
                FragmentDescriptor::new("cta", "/components/cta.html")
                    .with_fallback(FragmentTemplate::call_to_action()),
                FragmentDescriptor::new("breadcrumb", "/components/breadcrumb.html"),
            ],
        }
    }

    pub fn register(&mut self, descriptor: FragmentDescriptor) -> Result<(), RegistryError> {
        if descriptor.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.contains(&descriptor.name) {
            return Err(RegistryError::Duplicate(descriptor.name));
        }
        self.fragments.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FragmentDescriptor> {
        self.fragments.iter().find(|d| d.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FragmentDescriptor> {
        self.fragments.iter_mut().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|d| d.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FragmentDescriptor> {
        self.fragments.iter()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
