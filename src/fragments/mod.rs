//! Named HTML fragments: registry, typed fallbacks, sources and the caching loader.

pub mod descriptor;
pub mod initializers;
pub mod loader;
pub mod sources;
pub mod templates;

pub use descriptor::{container_id_for, FragmentDescriptor, FragmentRegistry, RegistryError};
pub use loader::{FragmentLoader, LoadError, LoadOptions, LoadOutcome, LoadRequest, LoadResult};
pub use sources::{Accept, DirectorySource, FetchError, FragmentSource, HttpSource};
pub use templates::{FragmentTemplate, TemplateLink};

#[cfg(test)]
mod tests;
