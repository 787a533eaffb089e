use std::path::Path;

use fcrepo_transport::TransportConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FedoraError, FedoraResult};

/// Environment variable that overrides [`FedoraConfig::base_url`].
pub const BASE_URL_ENV: &str = "FCREPO_BASE_URL";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/fcrepo/rest/";

/// Connection settings for a Fedora repository.
///
/// ```toml
/// base_url = "http://localhost:8080/fcrepo/rest/"
///
/// [transport]
/// user_agent = "my-app/1.0"
/// request_timeout_secs = 30
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FedoraConfig {
    pub base_url: String,
    pub transport: TransportConfig,
}

impl Default for FedoraConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            transport: TransportConfig::default(),
        }
    }
}

impl FedoraConfig {
    pub fn from_toml_str(text: &str) -> FedoraResult<Self> {
        toml::from_str(text).map_err(|e| FedoraError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> FedoraResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| FedoraError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply `FCREPO_BASE_URL` if it is set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        self
    }

    /// Check the base URL and normalize it to end with `/`.
    ///
    /// Paths are built by concatenation, so the URL must be an absolute
    /// `http` or `https` URL without query or fragment.
    pub fn validate(&mut self) -> FedoraResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            FedoraError::Config(format!("invalid base_url {:?}: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FedoraError::Config(format!(
                "base_url must use http or https, got {:?}",
                url.scheme()
            )));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(FedoraError::Config(
                "base_url must not have a query or fragment".into(),
            ));
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        Ok(())
    }
}
