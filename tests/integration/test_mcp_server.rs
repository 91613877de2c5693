//! Integration tests for the MCP server.

use matscout::mcp::{ListPropertiesResponse, SearchMaterialsParams};
use matscout::{Config, MatscoutServer, SearchMode, SearchRequest};
use rmcp::ServerHandler;

#[test]
fn test_server_creation() {
    let server = MatscoutServer::new(Config::default());
    assert!(server.is_ok(), "Server creation failed: {:?}", server.err());
}

#[test]
fn test_server_info() {
    let server = MatscoutServer::new(Config::default()).unwrap();
    let info = server.get_info();

    let instructions = info.instructions.expect("Server should have instructions");
    assert!(instructions.contains("matscout"));
    assert!(instructions.contains("search_materials"));
    assert!(info.capabilities.tools.is_some());
}

#[test]
fn test_search_params_from_tool_call() {
    let params: SearchMaterialsParams = serde_json::from_value(serde_json::json!({
        "query": "iron and oxygen",
        "properties": ["band_gap"],
        "max_results": 5,
        "demo": true
    }))
    .unwrap();

    let request = SearchRequest::from(params);
    assert_eq!(request.mode(), SearchMode::Demo);
    assert_eq!(request.max_results, Some(5));
    assert_eq!(request.properties, vec!["band_gap"]);
    assert!(request.credential.is_none());
}

#[test]
fn test_list_properties_labels() {
    let response = ListPropertiesResponse::new(
        vec!["band_gap".to_string(), "formula_pretty".to_string()],
        vec!["formula_pretty".to_string()],
    );
    assert_eq!(response.properties.len(), 2);
    assert_eq!(response.properties[0].name, "band_gap");
    assert_eq!(response.default_properties, vec!["formula_pretty"]);
}

#[tokio::test]
async fn test_loose_max_results_reaches_agent() {
    let mut config = Config::default();
    config.retrieval.api_key_env = None;
    let agent = matscout::MaterialsAgent::from_config(&config).unwrap();

    for (max_results, expected) in [(serde_json::json!("2"), 2), (serde_json::json!("plenty"), 4)] {
        let params: SearchMaterialsParams = serde_json::from_value(serde_json::json!({
            "query": "iron and oxygen",
            "max_results": max_results,
            "demo": true
        }))
        .unwrap();

        let response = agent.respond(&SearchRequest::from(params)).await;
        assert!(response.is_success(), "{}", response.message);
        assert_eq!(response.results.unwrap().len(), expected);
    }
}
