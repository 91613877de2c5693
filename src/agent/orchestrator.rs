//! Materials Agent.
//!
//! Drives one search end to end: extract chemistry from the user's text,
//! coerce options, retrieve records in the selected mode and shape them into
//! a column-aligned [`ResultSet`].

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{Config, SearchConfig};
use crate::error::{AuthenticationError, ErrorKind, Result, ScoutError};
use crate::extraction::{ElementExtractor, Extraction};
use crate::model::{Credential, Criteria, Query, ResultSet, SearchMode};
use crate::retrieval::RetrievalClient;

use super::options::{effective_max_results, effective_properties, result_columns};
use super::types::*;

/// Message shown when nothing chemical could be recognized.
const EXTRACTION_MESSAGE: &str = "Could not identify any chemical elements or formula in your query. \
     Try naming elements (\"iron and oxygen\") or a formula (\"Fe2O3\").";

// ============================================================================
// Materials Agent
// ============================================================================

/// Stateless query orchestrator.
pub struct MaterialsAgent {
    extractor: ElementExtractor,
    client: RetrievalClient,
    search: SearchConfig,
}

/// Everything one pipeline run produced.
struct Run {
    extraction: Option<Extraction>,
    criteria: Option<Criteria>,
    outcome: Result<Answer>,
    stats: SearchStats,
}

impl MaterialsAgent {
    /// Create an agent over an existing retrieval client.
    pub fn new(client: RetrievalClient, search: SearchConfig) -> Self {
        Self {
            extractor: ElementExtractor::new(),
            client,
            search,
        }
    }

    /// Create an agent backed by the Materials Project API and the configured
    /// demo dataset.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = RetrievalClient::from_config(config)?;
        Ok(Self::new(client, config.search.clone()))
    }

    /// Replace the extractor (e.g. with extra recognition strategies).
    pub fn with_extractor(mut self, extractor: ElementExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn client(&self) -> &RetrievalClient {
        &self.client
    }

    /// Run a search, returning typed errors.
    pub async fn answer(&self, request: &SearchRequest) -> Result<Answer> {
        self.run(request).await.outcome
    }

    /// Run a search and report the outcome as a structured response.
    ///
    /// Never fails: errors become `status = error` with a kind tag and message.
    pub async fn respond(&self, request: &SearchRequest) -> AgentResponse {
        let mode = request.mode();
        let run = self.run(request).await;

        let (elements, formulas) = match &run.extraction {
            Some(extraction) => (extraction.elements().to_vec(), extraction.formulas()),
            None => (Vec::new(), Vec::new()),
        };
        let target = run
            .criteria
            .as_ref()
            .map(Criteria::describe)
            .unwrap_or_default();

        let (status, error_kind, message, results) = match run.outcome {
            Ok(Answer::Found(results)) => (
                ResponseStatus::Success,
                None,
                success_message(mode, results.len(), &target),
                Some(results),
            ),
            Ok(Answer::Empty) => (
                ResponseStatus::Empty,
                None,
                empty_message(mode, &target),
                None,
            ),
            Err(e) => (
                ResponseStatus::Error,
                Some(e.kind()),
                error_message(&e),
                None,
            ),
        };

        AgentResponse {
            status,
            error_kind,
            message,
            mode,
            elements,
            formulas,
            results,
            stats: run.stats,
        }
    }

    async fn run(&self, request: &SearchRequest) -> Run {
        let total_start = Instant::now();
        let mut stats = SearchStats::default();

        // Extract
        let extract_start = Instant::now();
        let extraction = match self.extractor.extract(&request.query) {
            Ok(extraction) => extraction,
            Err(e) => {
                debug!("Extraction failed: {}", e);
                stats.extraction_time_ms = extract_start.elapsed().as_millis() as u64;
                stats.total_time_ms = total_start.elapsed().as_millis() as u64;
                return Run {
                    extraction: None,
                    criteria: None,
                    outcome: Err(e.into()),
                    stats,
                };
            }
        };
        stats.extraction_time_ms = extract_start.elapsed().as_millis() as u64;

        // Validate options
        let criteria = Criteria::from_extraction(&extraction);
        let max_results = effective_max_results(request.max_results, &self.search);
        let properties = effective_properties(&request.properties, &self.search);
        let columns = result_columns(&properties);
        let query = Query::new(
            criteria.clone(),
            max_results,
            properties,
            request.mode(),
            request.credential.clone(),
        );
        debug!(
            mode = %query.mode(),
            criteria = %criteria.describe(),
            max_results,
            columns = columns.len(),
            "Prepared query"
        );

        // Retrieve
        let retrieval_start = Instant::now();
        let retrieved = self.client.search(&query).await;
        stats.retrieval_time_ms = retrieval_start.elapsed().as_millis() as u64;

        // Shape
        let outcome = retrieved.map(|records| {
            if records.is_empty() {
                Answer::Empty
            } else {
                Answer::Found(ResultSet::shape(columns, &records))
            }
        });

        stats.result_count = outcome.as_ref().map(Answer::len).unwrap_or(0);
        stats.total_time_ms = total_start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(answer) => debug!(count = answer.len(), "Search complete"),
            Err(e) => debug!(kind = %e.kind(), "Search failed: {}", e),
        }

        Run {
            extraction: Some(extraction),
            criteria: Some(criteria),
            outcome,
            stats,
        }
    }

    /// Property names that can be requested.
    pub fn available_properties(&self) -> Vec<String> {
        self.client.available_properties()
    }

    /// Report whether a credential is usable in `mode`.
    ///
    /// With no explicit key, the configured environment variable is consulted.
    pub async fn configure_credential(
        &self,
        credential: Option<&Credential>,
        mode: SearchMode,
    ) -> CredentialStatus {
        if mode == SearchMode::Demo {
            return CredentialStatus {
                state: CredentialState::NotRequired,
                hint: None,
                message: "Demo mode does not use an API key.".to_string(),
            };
        }

        let Some(credential) = self.client.resolve_credential(credential) else {
            return CredentialStatus {
                state: CredentialState::NotConfigured,
                hint: None,
                message: "API key not configured. Provide a Materials Project API key or use demo mode."
                    .to_string(),
            };
        };

        let hint = credential.masked();
        match self.client.validate_credential(&credential).await {
            Ok(true) => {
                info!("API key {} accepted", hint);
                CredentialStatus {
                    state: CredentialState::Valid,
                    message: format!("API key {} is valid.", hint),
                    hint: Some(hint),
                }
            }
            Ok(false) => CredentialStatus {
                state: CredentialState::Invalid,
                message: format!("API key {} was rejected by the Materials Project.", hint),
                hint: Some(hint),
            },
            Err(e) => CredentialStatus {
                state: CredentialState::Unverified,
                message: format!("Could not verify API key {}: {}", hint, e),
                hint: Some(hint),
            },
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

fn mode_prefix(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Demo => "Demo mode: ",
        SearchMode::Live => "",
    }
}

fn success_message(mode: SearchMode, count: usize, target: &str) -> String {
    let noun = if count == 1 { "material" } else { "materials" };
    format!(
        "{}Found {} {} for {}.",
        mode_prefix(mode),
        count,
        noun,
        target
    )
}

fn empty_message(mode: SearchMode, target: &str) -> String {
    format!("{}No materials found for {}.", mode_prefix(mode), target)
}

fn error_message(error: &ScoutError) -> String {
    match error {
        ScoutError::Extraction(_) => EXTRACTION_MESSAGE.to_string(),
        ScoutError::Authentication(AuthenticationError::MissingCredential) => {
            "An API key is required for live search. Provide a Materials Project API key or enable demo mode."
                .to_string()
        }
        ScoutError::Authentication(AuthenticationError::Rejected(status)) => format!(
            "The Materials Project rejected the API key (HTTP {}). Check the key or enable demo mode.",
            status
        ),
        ScoutError::Retrieval(e) => format!(
            "Could not retrieve data from the Materials Project ({}). Try again later.",
            e
        ),
        other => match other.kind() {
            ErrorKind::Configuration => format!("Configuration error: {}", other),
            _ => other.to_string(),
        },
    }
}
