//! CLI command handlers.

use std::process::ExitCode;

use anyhow::Result;
use matscout::{
    agent::{MaterialsAgent, SearchRequest},
    mcp::ListPropertiesResponse,
    Config, Credential, SearchMode,
};

use super::output;

/// Options for the search command.
pub struct SearchArgs {
    pub query: String,
    pub properties: Vec<String>,
    pub limit: Option<i64>,
    pub demo: bool,
    pub api_key: Option<String>,
}

/// Run the search command.
pub async fn run_search(config: Config, args: SearchArgs, json_output: bool) -> Result<ExitCode> {
    let agent = MaterialsAgent::from_config(&config)?;

    let mut request = SearchRequest::new(args.query)
        .with_properties(args.properties)
        .with_demo(args.demo);
    request.max_results = args.limit;
    request.credential = args.api_key.and_then(Credential::new);

    let response = agent.respond(&request).await;
    output::print_search_response(&response, json_output)?;

    Ok(if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Run the properties command.
pub async fn run_properties(config: Config, json_output: bool) -> Result<ExitCode> {
    let agent = MaterialsAgent::from_config(&config)?;
    let response = ListPropertiesResponse::new(
        agent.available_properties(),
        config.search.default_properties.clone(),
    );
    output::print_properties(&response, json_output)?;
    Ok(ExitCode::SUCCESS)
}

/// Run the check-key command.
pub async fn run_check_key(
    config: Config,
    api_key: Option<String>,
    json_output: bool,
) -> Result<ExitCode> {
    let agent = MaterialsAgent::from_config(&config)?;
    let credential = api_key.and_then(Credential::new);
    let status = agent
        .configure_credential(credential.as_ref(), SearchMode::Live)
        .await;
    output::print_credential_status(&status, json_output)?;

    Ok(if status.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
