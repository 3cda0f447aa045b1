//! Static site served over HTTP.

use super::{ensure_non_empty, Accept, FetchError, FragmentSource};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("epl-site/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport {
                path: base.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|e| FetchError::InvalidPath {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl FragmentSource for HttpSource {
    fn name(&self) -> &'static str {
        "http"
    }

    #[instrument(skip(self), fields(base = %self.base))]
    async fn fetch(&self, path: &str, accept: Accept) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept.mime())
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout(path.to_string())
                } else {
                    FetchError::Transport {
                        path: path.to_string(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        debug!(bytes = body.len(), "response received");
        ensure_non_empty(path, body)
    }
}
