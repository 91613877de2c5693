//! Mode-aware retrieval client.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::{Config, RetrievalConfig};
use crate::error::{AuthenticationError, ConfigError, Result, RetrievalError};
use crate::model::{fields, Credential, MaterialRecord, Query, SearchMode, SUMMARY_FIELDS};

use super::{DemoDataset, MaterialsProjectProvider, MaterialsProvider};

/// Routes a [`Query`] to the live provider or the demo dataset.
pub struct RetrievalClient {
    provider: Option<Arc<dyn MaterialsProvider>>,
    demo: Arc<DemoDataset>,
    timeout: Duration,
    api_key_env: Option<String>,
}

impl RetrievalClient {
    /// Create a client from explicit parts.
    ///
    /// `provider` may be `None` for demo-only use; live searches then fail
    /// with a configuration error.
    pub fn new(
        provider: Option<Arc<dyn MaterialsProvider>>,
        demo: Arc<DemoDataset>,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            provider,
            demo,
            timeout: Duration::from_secs(config.timeout_secs),
            api_key_env: config.api_key_env.clone(),
        }
    }

    /// Create a client backed by the Materials Project API.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = MaterialsProjectProvider::from_config(&config.retrieval)?;
        Ok(Self::new(
            Some(Arc::new(provider)),
            Arc::new(DemoDataset::from_config(config)),
            &config.retrieval,
        ))
    }

    pub fn demo(&self) -> &Arc<DemoDataset> {
        &self.demo
    }

    pub fn has_live_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// The explicit credential, or one read from the configured environment variable.
    pub fn resolve_credential(&self, explicit: Option<&Credential>) -> Option<Credential> {
        if let Some(credential) = explicit {
            return Some(credential.clone());
        }
        let var = self.api_key_env.as_deref()?;
        let credential = std::env::var(var).ok().and_then(Credential::new)?;
        debug!(env = var, "Using API key from environment");
        Some(credential)
    }

    /// Property names that can be requested.
    pub fn available_properties(&self) -> Vec<String> {
        let fields = match &self.provider {
            Some(provider) => provider.supported_fields(),
            None => SUMMARY_FIELDS,
        };
        fields.iter().map(|f| f.to_string()).collect()
    }

    /// Run a query in its selected mode.
    pub async fn search(&self, query: &Query) -> Result<Vec<MaterialRecord>> {
        match query.mode() {
            SearchMode::Demo => Ok(self.demo.search(query.criteria(), query.max_results())),
            SearchMode::Live => self.search_live(query).await,
        }
    }

    async fn search_live(&self, query: &Query) -> Result<Vec<MaterialRecord>> {
        let provider = self.provider.as_ref().ok_or(ConfigError::NoLiveProvider)?;
        let credential = self
            .resolve_credential(query.credential())
            .ok_or(AuthenticationError::MissingCredential)?;

        let fields = requested_fields(query.properties(), provider.supported_fields());
        debug!(
            provider = provider.name(),
            criteria = %query.criteria().describe(),
            fields = fields.len(),
            limit = query.max_results(),
            "Live search"
        );

        let search = provider.search(query.criteria(), &fields, query.max_results(), &credential);
        let mut records = tokio::time::timeout(self.timeout, search)
            .await
            .map_err(|_| RetrievalError::Timeout(self.timeout.as_millis() as u64))??;

        records.truncate(query.max_results());
        Ok(records)
    }

    /// Check a credential against the live provider.
    pub async fn validate_credential(&self, credential: &Credential) -> Result<bool> {
        let provider = self.provider.as_ref().ok_or(ConfigError::NoLiveProvider)?;
        tokio::time::timeout(self.timeout, provider.validate_credential(credential))
            .await
            .map_err(|_| RetrievalError::Timeout(self.timeout.as_millis() as u64))?
    }
}

/// Top-level fields to request for `properties`, restricted to `supported`.
///
/// Unsupported names are dropped here and come back as null columns.
fn requested_fields(properties: &[String], supported: &[&str]) -> Vec<String> {
    let mut requested: Vec<String> = Vec::new();
    for property in properties {
        let field = fields::top_level_field(property);
        if !supported.contains(&field) {
            warn!(property = %property, "Property not supported by provider; it will be empty");
            continue;
        }
        if !requested.iter().any(|f| f == field) {
            requested.push(field.to_string());
        }
    }
    requested
}
