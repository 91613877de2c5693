//! Request and response types for the materials agent.

use serde::{Deserialize, Serialize};

use crate::chemistry::{Element, Formula};
use crate::error::ErrorKind;
use crate::model::{Credential, ResultSet, SearchMode};

// ============================================================================
// Search Request
// ============================================================================

/// One user submission.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Free-text description of the wanted materials
    pub query: String,
    /// Requested property names; empty selects the defaults
    pub properties: Vec<String>,
    /// Result cap; missing or non-positive selects the default
    pub max_results: Option<i64>,
    /// Use the offline dataset instead of the live service
    pub demo: bool,
    /// API key for live mode
    pub credential: Option<Credential>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_properties<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.properties = properties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    /// Attach an API key. Blank keys are treated as absent.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.credential = Credential::new(api_key);
        self
    }

    pub fn mode(&self) -> SearchMode {
        SearchMode::from_demo_flag(self.demo)
    }
}

// ============================================================================
// Answer
// ============================================================================

/// Outcome of a search that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    /// At least one record matched
    Found(ResultSet),
    /// Retrieval succeeded but nothing matched
    Empty,
}

impl Answer {
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Self::Found(results) => Some(results),
            Self::Empty => None,
        }
    }

    pub fn len(&self) -> usize {
        self.result_set().map(ResultSet::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

// ============================================================================
// Agent Response
// ============================================================================

/// Status reported at the outer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Empty,
    Error,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Empty => "empty",
            Self::Error => "error",
        }
    }
}

/// Timing for one search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Extraction time in milliseconds
    pub extraction_time_ms: u64,
    /// Retrieval time in milliseconds
    pub retrieval_time_ms: u64,
    /// Total time in milliseconds
    pub total_time_ms: u64,
    /// Number of rows returned
    pub result_count: usize,
}

/// Table-ready result or structured error. Never carries the credential.
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub status: ResponseStatus,
    /// Set when `status` is `error`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Human-readable summary
    pub message: String,
    pub mode: SearchMode,
    /// Display element set
    pub elements: Vec<Element>,
    /// Formulas, when the query was in formula mode
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formulas: Vec<Formula>,
    /// Present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<ResultSet>,
    pub stats: SearchStats,
}

impl AgentResponse {
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status == ResponseStatus::Error
    }

    pub fn symbols(&self) -> Vec<&'static str> {
        self.elements.iter().map(|e| e.symbol()).collect()
    }
}

// ============================================================================
// Credential Status
// ============================================================================

/// Result of checking the configured API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialState {
    /// Demo mode does not use a key
    NotRequired,
    /// No key supplied or found in the environment
    NotConfigured,
    Valid,
    Invalid,
    /// The check itself failed (network, timeout)
    Unverified,
}

/// Credential report. Only ever contains the masked hint.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub state: CredentialState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub message: String,
}

impl CredentialStatus {
    pub fn is_valid(&self) -> bool {
        self.state == CredentialState::Valid
    }
}
