//! Materials Project summary API provider.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::RetrievalConfig;
use crate::error::{AuthenticationError, Result, RetrievalError};
use crate::model::{Credential, Criteria, MaterialRecord, FORMULA_FIELD, IDENTIFIER_FIELD};

use super::MaterialsProvider;

/// Summary endpoint path, relative to the base URL.
const SUMMARY_PATH: &str = "/materials/summary/";

/// Material used for credential checks (silicon).
const PROBE_MATERIAL_ID: &str = "mp-149";

/// Provider backed by the Materials Project REST API.
pub struct MaterialsProjectProvider {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

/// Summary endpoint response format.
#[derive(Debug, Deserialize)]
struct SummaryResponse {
    data: Vec<serde_json::Value>,
}

/// Error response format.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: serde_json::Value,
}

impl MaterialsProjectProvider {
    /// Create a provider from configuration.
    pub fn from_config(config: &RetrievalConfig) -> Result<Self> {
        Self::new(&config.base_url, config.timeout_secs)
    }

    /// Create a provider with explicit parameters.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("matscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RetrievalError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    fn summary_url(&self) -> String {
        format!("{}{}", self.base_url, SUMMARY_PATH)
    }

    /// Query parameters for a summary search.
    pub fn search_params(
        criteria: &Criteria,
        fields: &[String],
        limit: usize,
    ) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);

        match criteria {
            Criteria::Elements(elements) => {
                let symbols: Vec<&str> = elements.iter().map(|e| e.symbol()).collect();
                params.push(("elements", symbols.join(",")));
            }
            Criteria::Formulas(formulas) => {
                let texts: Vec<&str> = formulas.iter().map(|f| f.as_str()).collect();
                params.push(("formula", texts.join(",")));
            }
        }

        let mut requested: Vec<&str> = vec![IDENTIFIER_FIELD];
        for field in fields {
            if !requested.contains(&field.as_str()) {
                requested.push(field);
            }
        }
        params.push(("_fields", requested.join(",")));
        params.push(("_limit", limit.to_string()));

        params
    }

    /// Issue a summary request and decode its records.
    async fn fetch(
        &self,
        params: &[(&'static str, String)],
        credential: &Credential,
    ) -> Result<Vec<MaterialRecord>> {
        let url = self.summary_url();

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", credential.expose())
            .header("Accept", "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RetrievalError::Timeout(self.timeout_secs * 1000)
                } else if e.is_connect() {
                    RetrievalError::Connection(e.to_string())
                } else {
                    RetrievalError::Request(e.to_string())
                }
            })?;

        let status = response.status();

        if status.is_success() {
            let body: SummaryResponse = response.json().await.map_err(|e| {
                RetrievalError::InvalidResponse(format!("Failed to parse response: {}", e))
            })?;

            let records = body
                .data
                .into_iter()
                .map(MaterialRecord::from_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;

            debug!(count = records.len(), "Summary request succeeded");
            Ok(records)
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(AuthenticationError::Rejected(status.as_u16()).into())
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            let message = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(ErrorResponse {
                    detail: serde_json::Value::String(detail),
                }) => detail,
                Ok(ErrorResponse { detail }) => detail.to_string(),
                Err(_) => error_text,
            };

            Err(RetrievalError::Service {
                status: status.as_u16(),
                message,
            }
            .into())
        }
    }
}

#[async_trait]
impl MaterialsProvider for MaterialsProjectProvider {
    fn name(&self) -> &str {
        "materials_project"
    }

    async fn search(
        &self,
        criteria: &Criteria,
        fields: &[String],
        limit: usize,
        credential: &Credential,
    ) -> Result<Vec<MaterialRecord>> {
        let params = Self::search_params(criteria, fields, limit);
        debug!(criteria = %criteria.describe(), limit, "Querying Materials Project");
        self.fetch(&params, credential).await
    }

    async fn validate_credential(&self, credential: &Credential) -> Result<bool> {
        let params = [
            ("material_ids", PROBE_MATERIAL_ID.to_string()),
            ("_fields", format!("{},{}", IDENTIFIER_FIELD, FORMULA_FIELD)),
            ("_limit", "1".to_string()),
        ];

        match self.fetch(&params, credential).await {
            Ok(records) => Ok(!records.is_empty()),
            Err(crate::error::ScoutError::Authentication(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
