//! Materials agent tests against a scripted provider and the demo dataset.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use matscout::agent::{Answer, MaterialsAgent, ResponseStatus, SearchRequest};
use matscout::config::{RetrievalConfig, SearchConfig};
use matscout::{
    AuthenticationError, Credential, Criteria, DemoDataset, ErrorKind, MaterialRecord,
    MaterialsProvider, RetrievalClient, RetrievalError, ScoutError,
};
use serde_json::json;

// ============================================================================
// Scripted Provider
// ============================================================================

enum Script {
    Records(Vec<MaterialRecord>),
    Reject(u16),
    Fail(RetrievalError),
    Hang,
}

/// Arguments of one provider call.
#[derive(Debug, Clone)]
struct Call {
    criteria: Criteria,
    fields: Vec<String>,
    limit: usize,
    credential: String,
}

struct ScriptedProvider {
    script: Script,
    calls: AtomicUsize,
    last_call: Mutex<Option<Call>>,
}

impl ScriptedProvider {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_call(&self) -> Call {
        self.last_call
            .lock()
            .unwrap()
            .clone()
            .expect("provider was not called")
    }
}

#[async_trait]
impl MaterialsProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(
        &self,
        criteria: &Criteria,
        fields: &[String],
        limit: usize,
        credential: &Credential,
    ) -> matscout::Result<Vec<MaterialRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some(Call {
            criteria: criteria.clone(),
            fields: fields.to_vec(),
            limit,
            credential: credential.expose().to_string(),
        });

        match &self.script {
            Script::Records(records) => Ok(records.clone()),
            Script::Reject(status) => Err(AuthenticationError::Rejected(*status).into()),
            Script::Fail(e) => Err(e.clone().into()),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Vec::new())
            }
        }
    }

    async fn validate_credential(&self, credential: &Credential) -> matscout::Result<bool> {
        Ok(credential.expose() == "good-key-123456")
    }
}

fn record(value: serde_json::Value) -> MaterialRecord {
    MaterialRecord::from_value(value).unwrap()
}

fn iron_oxides() -> Vec<MaterialRecord> {
    vec![
        record(json!({
            "material_id": "mp-19770",
            "formula_pretty": "Fe2O3",
            "elements": ["Fe", "O"],
            "band_gap": 2.0,
            "symmetry": {"crystal_system": "Trigonal", "symbol": "R-3c", "number": 167}
        })),
        record(json!({
            "material_id": "mp-19306",
            "formula_pretty": "Fe3O4",
            "elements": ["Fe", "O"],
            "band_gap": 0.0
        })),
    ]
}

fn live_agent(provider: Arc<ScriptedProvider>) -> MaterialsAgent {
    live_agent_with_timeout(provider, 30)
}

fn live_agent_with_timeout(provider: Arc<ScriptedProvider>, timeout_secs: u64) -> MaterialsAgent {
    let retrieval = RetrievalConfig {
        api_key_env: None,
        timeout_secs,
        ..Default::default()
    };
    let client = RetrievalClient::new(
        Some(provider as Arc<dyn MaterialsProvider>),
        Arc::new(DemoDataset::embedded()),
        &retrieval,
    );
    MaterialsAgent::new(client, SearchConfig::default())
}

// ============================================================================
// Live Mode
// ============================================================================

#[tokio::test]
async fn test_live_search_without_key_never_calls_provider() {
    let provider = ScriptedProvider::new(Script::Records(iron_oxides()));
    let agent = live_agent(provider.clone());

    let err = agent
        .answer(&SearchRequest::new("iron and oxygen"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ScoutError::Authentication(AuthenticationError::MissingCredential)
    ));
    assert_eq!(provider.calls(), 0);

    let response = agent
        .respond(&SearchRequest::new("iron and oxygen").with_api_key("   "))
        .await;
    assert_eq!(response.error_kind, Some(ErrorKind::Authentication));
    assert!(response.message.contains("API key is required"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_live_search_passes_query_to_provider() {
    let provider = ScriptedProvider::new(Script::Records(iron_oxides()));
    let agent = live_agent(provider.clone());

    let request = SearchRequest::new("Find materials with iron and oxygen")
        .with_properties(["formula_pretty", "symmetry.crystal_system", "band_gap"])
        .with_max_results(5)
        .with_api_key("good-key-123456");
    let answer = agent.answer(&request).await.unwrap();
    assert_eq!(answer.len(), 2);

    let call = provider.last_call();
    assert_eq!(provider.calls(), 1);
    assert_eq!(call.limit, 5);
    assert_eq!(call.credential, "good-key-123456");
    assert_eq!(call.criteria.describe(), "Fe-O");
    assert_eq!(call.fields, vec!["formula_pretty", "symmetry", "band_gap"]);
}

#[tokio::test]
async fn test_formula_takes_precedence_over_elements() {
    let provider = ScriptedProvider::new(Script::Records(iron_oxides()));
    let agent = live_agent(provider.clone());

    let request = SearchRequest::new("Fe2O3 made of iron").with_api_key("good-key-123456");
    agent.answer(&request).await.unwrap();

    let call = provider.last_call();
    assert!(call.criteria.is_formula());
    assert_eq!(call.criteria.describe(), "Fe2O3");
}

#[tokio::test]
async fn test_results_are_column_aligned() {
    let provider = ScriptedProvider::new(Script::Records(iron_oxides()));
    let agent = live_agent(provider);

    let request = SearchRequest::new("iron oxygen")
        .with_properties(["symmetry.crystal_system", "band_gap", "not_a_property"])
        .with_api_key("good-key-123456");
    let answer = agent.answer(&request).await.unwrap();
    let results = answer.result_set().unwrap();

    assert_eq!(
        results.columns(),
        &[
            "material_id",
            "symmetry.crystal_system",
            "band_gap",
            "not_a_property"
        ]
    );
    for row in results.rows() {
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys, results.columns());
        assert!(row.get("not_a_property").unwrap().is_null());
    }

    let first = &results.rows()[0];
    assert_eq!(first.get("material_id").unwrap().as_str(), Some("mp-19770"));
    assert_eq!(
        first.get("symmetry.crystal_system").unwrap().as_str(),
        Some("Trigonal")
    );
    // Missing nested object on the second record
    assert!(results.rows()[1]
        .get("symmetry.crystal_system")
        .unwrap()
        .is_null());
}

#[tokio::test]
async fn test_provider_overflow_is_truncated() {
    let records: Vec<MaterialRecord> = (0..10)
        .map(|i| {
            record(json!({
                "material_id": format!("mp-{}", i),
                "formula_pretty": "Si",
                "elements": ["Si"]
            }))
        })
        .collect();
    let provider = ScriptedProvider::new(Script::Records(records));
    let agent = live_agent(provider);

    let request = SearchRequest::new("silicon")
        .with_max_results(3)
        .with_api_key("good-key-123456");
    assert_eq!(agent.answer(&request).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_max_results_coercion() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider.clone());

    for (requested, expected) in [(None, 20), (Some(0), 20), (Some(-4), 20), (Some(10_000), 200)] {
        let mut request = SearchRequest::new("Si").with_api_key("good-key-123456");
        request.max_results = requested;
        agent.answer(&request).await.unwrap();
        assert_eq!(provider.last_call().limit, expected, "requested {:?}", requested);
    }
}

#[tokio::test]
async fn test_empty_result_is_not_an_error() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider);

    let request = SearchRequest::new("gold and platinum").with_api_key("good-key-123456");
    let answer = agent.answer(&request).await.unwrap();
    assert_eq!(answer, Answer::Empty);

    let response = agent.respond(&request).await;
    assert_eq!(response.status, ResponseStatus::Empty);
    assert_eq!(response.message, "No materials found for Au-Pt.");
    assert!(response.results.is_none());
}

#[tokio::test]
async fn test_rejected_key_is_authentication_error() {
    let provider = ScriptedProvider::new(Script::Reject(403));
    let agent = live_agent(provider);

    let response = agent
        .respond(&SearchRequest::new("copper").with_api_key("revoked-key-123"))
        .await;
    assert_eq!(response.status, ResponseStatus::Error);
    assert_eq!(response.error_kind, Some(ErrorKind::Authentication));
    assert!(response.message.contains("HTTP 403"));
    assert!(!response.message.contains("revoked-key-123"));
}

#[tokio::test]
async fn test_service_failure_is_retrieval_error() {
    let provider = ScriptedProvider::new(Script::Fail(RetrievalError::Service {
        status: 502,
        message: "Bad Gateway".to_string(),
    }));
    let agent = live_agent(provider);

    let response = agent
        .respond(&SearchRequest::new("copper").with_api_key("good-key-123456"))
        .await;
    assert_eq!(response.error_kind, Some(ErrorKind::Retrieval));
    assert!(response.message.starts_with("Could not retrieve data"));
    assert_eq!(response.symbols(), vec!["Cu"]);
}

#[tokio::test]
async fn test_slow_provider_times_out() {
    let provider = ScriptedProvider::new(Script::Hang);
    let agent = live_agent_with_timeout(provider, 1);

    let err = agent
        .answer(&SearchRequest::new("copper").with_api_key("good-key-123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, ScoutError::Retrieval(RetrievalError::Timeout(1000))));
}

#[tokio::test]
async fn test_configure_credential_against_provider() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider);

    let good = Credential::new("good-key-123456").unwrap();
    let status = agent
        .configure_credential(Some(&good), matscout::SearchMode::Live)
        .await;
    assert!(status.is_valid());
    assert_eq!(status.hint.as_deref(), Some("********3456"));

    let bad = Credential::new("bad-key-999999").unwrap();
    let status = agent
        .configure_credential(Some(&bad), matscout::SearchMode::Live)
        .await;
    assert!(!status.is_valid());
    assert!(!status.message.contains("bad-key-999999"));
}

// ============================================================================
// Demo Mode
// ============================================================================

#[tokio::test]
async fn test_demo_mode_never_calls_provider() {
    let provider = ScriptedProvider::new(Script::Reject(401));
    let agent = live_agent(provider.clone());

    let request = SearchRequest::new("iron and oxygen").with_demo(true);
    let answer = agent.answer(&request).await.unwrap();
    assert!(!answer.is_empty());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_demo_search_is_idempotent() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider);

    let request = SearchRequest::new("Oxides of titanium: Ti and O")
        .with_properties(["formula_pretty", "band_gap", "density"])
        .with_demo(true);
    let first = agent.answer(&request).await.unwrap();
    let second = agent.answer(&request).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_demo_formula_matches_composition() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider);

    let request = SearchRequest::new("NaCl")
        .with_properties(["formula_pretty"])
        .with_demo(true);
    let response = agent.respond(&request).await;
    assert!(response.is_success(), "{}", response.message);
    assert_eq!(response.message, "Demo mode: Found 1 material for NaCl.");

    let results = response.results.unwrap();
    assert_eq!(
        results.rows()[0].get("formula_pretty").unwrap().as_str(),
        Some("NaCl")
    );
}

#[tokio::test]
async fn test_demo_element_search_is_superset_match() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider);

    let request = SearchRequest::new("lithium and oxygen")
        .with_properties(["formula_pretty"])
        .with_demo(true);
    let answer = agent.answer(&request).await.unwrap();
    let formulas: Vec<String> = answer
        .result_set()
        .unwrap()
        .rows()
        .iter()
        .map(|row| row.get("formula_pretty").unwrap().to_string())
        .collect();
    assert_eq!(formulas, vec!["LiFePO4", "LiCoO2"]);
}

#[tokio::test]
async fn test_demo_search_with_huge_formula_counts() {
    let provider = ScriptedProvider::new(Script::Records(Vec::new()));
    let agent = live_agent(provider);

    let response = agent
        .respond(&SearchRequest::new("H4000000000H4000000000").with_demo(true))
        .await;
    assert_eq!(response.error_kind, Some(ErrorKind::Extraction));

    let response = agent
        .respond(&SearchRequest::new("H4000000000O").with_demo(true))
        .await;
    assert_eq!(response.status, ResponseStatus::Empty);
}
