//! Static site read from a local directory.

use super::{ensure_non_empty, Accept, FetchError, FragmentSource};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Site-absolute path to a file under the root. Never escapes the root.
    fn resolve(&self, path: &str) -> Result<PathBuf, FetchError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(FetchError::InvalidPath {
                path: path.to_string(),
                reason: "path leaves the site root".into(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl FragmentSource for DirectorySource {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, path: &str, _accept: Accept) -> Result<String, FetchError> {
        let file = self.resolve(path)?;
        let body = fs::read_to_string(&file).await.map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound(path.to_string())
            } else {
                FetchError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        })?;
        ensure_non_empty(path, body)
    }
}
