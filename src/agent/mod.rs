//! Agent orchestration: natural-language query in, table-ready result out.

mod options;
mod orchestrator;
mod types;

pub use options::{effective_max_results, effective_properties, result_columns};
pub use orchestrator::MaterialsAgent;
pub use types::{
    AgentResponse, Answer, CredentialState, CredentialStatus, ResponseStatus, SearchRequest,
    SearchStats,
};
