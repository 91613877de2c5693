//! matscout: natural-language search over crystalline materials
//!
//! Turns free text such as "materials with iron and oxygen" or "Fe2O3" into a
//! structured element/formula query, retrieves matching records from the
//! Materials Project (or a bundled offline dataset) and shapes them into a
//! column-aligned table. The same pipeline is exposed as a library, a CLI and
//! an MCP server.

pub mod agent;
pub mod chemistry;
pub mod config;
pub mod error;
pub mod extraction;
pub mod mcp;
pub mod model;
pub mod retrieval;

pub use agent::{AgentResponse, Answer, MaterialsAgent, ResponseStatus, SearchRequest};
pub use chemistry::{Element, Formula};
pub use config::{Config, TransportType};
pub use error::{
    AuthenticationError, ConfigError, ErrorKind, ExtractionError, Result, RetrievalError,
    ScoutError,
};
pub use extraction::{ElementExtractor, ElementToken, Extraction, TokenClassifier};
pub use mcp::{run_server, MatscoutServer};
pub use model::{
    Credential, Criteria, MaterialRecord, PropertyValue, Query, ResultRow, ResultSet, SearchMode,
};
pub use retrieval::{DemoDataset, MaterialsProjectProvider, MaterialsProvider, RetrievalClient};
