//! MCP server implementation for matscout.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use serde::Serialize;
use tracing::debug;

use crate::agent::{MaterialsAgent, SearchRequest};
use crate::config::Config;
use crate::model::{Credential, SearchMode};

use super::tools::{CheckCredentialParams, ListPropertiesResponse, SearchMaterialsParams};

/// matscout MCP server handler.
#[derive(Clone)]
pub struct MatscoutServer {
    agent: Arc<MaterialsAgent>,
    config: Arc<Config>,
    tool_router: ToolRouter<Self>,
}

impl MatscoutServer {
    /// Create a server backed by the Materials Project API.
    pub fn new(config: Config) -> crate::error::Result<Self> {
        let agent = MaterialsAgent::from_config(&config)?;
        Ok(Self::with_agent(Arc::new(agent), config))
    }

    /// Create a server around an existing agent.
    pub fn with_agent(agent: Arc<MaterialsAgent>, config: Config) -> Self {
        Self {
            agent,
            config: Arc::new(config),
            tool_router: Self::tool_router(),
        }
    }

    /// Create a server with configuration loaded from the default locations.
    pub fn with_defaults() -> crate::error::Result<Self> {
        let config = Config::load()?;
        Self::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, McpError> {
    serde_json::to_string_pretty(value).map_err(|e| McpError::internal_error(e.to_string(), None))
}

#[tool_router]
impl MatscoutServer {
    /// Search crystalline materials using a natural language description.
    #[tool(
        description = "Search crystalline materials by natural language. Recognizes element names ('iron and oxygen'), symbols ('Fe, O') and formulas ('Fe2O3'). Returns a table of material_id plus the requested properties. Set demo=true to search the built-in sample dataset without an API key."
    )]
    async fn search_materials(
        &self,
        Parameters(params): Parameters<SearchMaterialsParams>,
    ) -> Result<CallToolResult, McpError> {
        let request = SearchRequest::from(params);
        debug!(mode = %request.mode(), "search_materials called");

        let response = self.agent.respond(&request).await;
        let body = to_json(&response)?;

        if response.is_error() {
            Ok(CallToolResult::error(vec![Content::text(body)]))
        } else {
            Ok(CallToolResult::success(vec![Content::text(body)]))
        }
    }

    /// List the material properties that can be requested.
    #[tool(description = "List the material properties that can be requested from search_materials.")]
    async fn list_properties(&self) -> Result<CallToolResult, McpError> {
        let response = ListPropertiesResponse::new(
            self.agent.available_properties(),
            self.config.search.default_properties.clone(),
        );
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &response,
        )?)]))
    }

    /// Check whether a Materials Project API key is accepted.
    #[tool(
        description = "Check whether a Materials Project API key is valid. Only a masked hint of the key is ever returned."
    )]
    async fn check_credential(
        &self,
        Parameters(params): Parameters<CheckCredentialParams>,
    ) -> Result<CallToolResult, McpError> {
        let credential = params.api_key.and_then(Credential::new);
        let status = self
            .agent
            .configure_credential(credential.as_ref(), SearchMode::Live)
            .await;
        Ok(CallToolResult::success(vec![Content::text(to_json(
            &status,
        )?)]))
    }
}

#[tool_handler]
impl ServerHandler for MatscoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "matscout searches crystalline materials from natural language. \
                 Use 'search_materials' with a query such as 'iron and oxygen' or 'Fe2O3', \
                 'list_properties' to see selectable columns, \
                 and 'check_credential' to verify a Materials Project API key."
                    .to_string(),
            ),
        }
    }
}
