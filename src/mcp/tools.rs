//! MCP tool parameter and response types.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::agent::SearchRequest;
use crate::model::{column_label, Credential};

// ============================================================================
// Search Tool Types
// ============================================================================

/// Parameters for the search_materials tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SearchMaterialsParams {
    /// Natural language description of the materials.
    ///
    /// Examples:
    /// - "materials with iron and oxygen"
    /// - "Fe2O3"
    /// - "compounds of lithium, cobalt and oxygen"
    pub query: String,

    /// Properties to return, e.g. ["formula_pretty", "band_gap", "density"].
    /// `material_id` is always included. Default: ["formula_pretty"].
    #[serde(default)]
    pub properties: Option<Vec<String>>,

    /// Maximum number of results (default: 20, max: 200).
    #[serde(default, deserialize_with = "lenient_max_results")]
    pub max_results: Option<i64>,

    /// Search the built-in sample dataset instead of the live database.
    #[serde(default)]
    pub demo: Option<bool>,

    /// Materials Project API key. Falls back to the server's MP_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl From<SearchMaterialsParams> for SearchRequest {
    fn from(params: SearchMaterialsParams) -> Self {
        SearchRequest {
            query: params.query,
            properties: params.properties.unwrap_or_default(),
            max_results: params.max_results,
            demo: params.demo.unwrap_or(false),
            credential: params.api_key.and_then(Credential::new),
        }
    }
}

/// Accepts integers, floats and numeric strings. Anything else is treated as
/// absent so the agent applies its default.
fn lenient_max_results<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_max_results))
}

fn coerce_max_results(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds
    value.is_finite().then(|| value.trunc() as i64)
}

// ============================================================================
// Credential Tool Types
// ============================================================================

/// Parameters for the check_credential tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CheckCredentialParams {
    /// API key to check. Falls back to the server's MP_API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
}

// ============================================================================
// Properties Tool Types
// ============================================================================

/// One selectable property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    /// Column heading used in tables
    pub label: String,
}

/// Response from the list_properties tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPropertiesResponse {
    pub properties: Vec<PropertyInfo>,
    /// Used when a search selects no properties
    pub default_properties: Vec<String>,
}

impl ListPropertiesResponse {
    pub fn new(names: Vec<String>, default_properties: Vec<String>) -> Self {
        let properties = names
            .into_iter()
            .map(|name| PropertyInfo {
                label: column_label(&name).to_string(),
                name,
            })
            .collect();
        Self {
            properties,
            default_properties,
        }
    }
}
