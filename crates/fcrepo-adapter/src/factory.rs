use std::sync::Arc;

use fcrepo_transport::{HttpTransport, ReqwestTransport};

use crate::adapter::FedoraAdapter;
use crate::config::FedoraConfig;
use crate::error::{FedoraError, FedoraResult};
use crate::metadata::{JsonLdMetadataParser, ResourceMetadataParser};

/// Builds adapters that share one transport and one metadata parser.
///
/// The factory is `Send + Sync`; adapters it hands out are cheap to create
/// and independent of each other.
pub struct FedoraFactory {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    parser: Arc<dyn ResourceMetadataParser>,
}

impl FedoraFactory {
    /// Validate `config` and build the shared HTTP client.
    pub fn new(mut config: FedoraConfig) -> FedoraResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.transport)
            .map_err(|e| FedoraError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self::with_transport(config.base_url, Arc::new(transport)))
    }

    /// Use an existing transport, e.g. an in-memory repository.
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            parser: Arc::new(JsonLdMetadataParser),
        }
    }

    /// Replace the metadata parser handed to new adapters.
    pub fn with_parser(mut self, parser: Arc<dyn ResourceMetadataParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn factor_adapter(&self) -> FedoraAdapter {
        FedoraAdapter::new(
            self.base_url.clone(),
            Arc::clone(&self.transport),
            Arc::clone(&self.parser),
        )
    }
}

impl std::fmt::Debug for FedoraFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FedoraFactory")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
