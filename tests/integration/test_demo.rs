//! Demo dataset loading through configuration.

use std::io::Write;
use std::sync::Arc;

use matscout::agent::{MaterialsAgent, ResponseStatus, SearchRequest};
use matscout::{Config, DemoDataset};
use tempfile::NamedTempFile;

fn dataset_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config_with_dataset(file: &NamedTempFile) -> Config {
    let mut config = Config::default();
    config.retrieval.api_key_env = None;
    config.demo.dataset_path = Some(file.path().display().to_string());
    config
}

#[tokio::test]
async fn test_custom_dataset_from_config() {
    let file = dataset_file(
        r#"{
            "version": 1,
            "materials": [
                {"material_id": "custom-1", "formula_pretty": "Ag", "elements": ["Ag"], "density": 10.5},
                {"material_id": "custom-2", "formula_pretty": "AgCl", "elements": ["Ag", "Cl"]}
            ]
        }"#,
    );
    let agent = MaterialsAgent::from_config(&config_with_dataset(&file)).unwrap();

    let request = SearchRequest::new("silver")
        .with_properties(["formula_pretty", "density"])
        .with_demo(true);
    let response = agent.respond(&request).await;
    assert!(response.is_success(), "{}", response.message);

    let results = response.results.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results.rows()[0].get("density").unwrap().as_f64(), Some(10.5));
    assert!(results.rows()[1].get("density").unwrap().is_null());
}

#[tokio::test]
async fn test_malformed_dataset_behaves_as_empty() {
    let file = dataset_file("[{ this is not json");
    let agent = MaterialsAgent::from_config(&config_with_dataset(&file)).unwrap();

    let response = agent
        .respond(&SearchRequest::new("iron").with_demo(true))
        .await;
    assert_eq!(response.status, ResponseStatus::Empty);
    assert_eq!(response.message, "Demo mode: No materials found for Fe.");
}

#[tokio::test]
async fn test_file_dataset_is_read_once_and_cached() {
    let file = dataset_file(
        r#"[
            {"material_id": "custom-si", "formula_pretty": "Si", "elements": ["Si"]},
            {"material_id": "custom-sic", "formula_pretty": "SiC", "elements": ["Si", "C"]}
        ]"#,
    );
    let dataset = Arc::new(DemoDataset::from_path(file.path()));
    let criteria = matscout::Criteria::Elements(vec![matscout::Element::SI]);
    let barrier = Arc::new(tokio::sync::Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let dataset = Arc::clone(&dataset);
            let criteria = criteria.clone();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                dataset.search(&criteria, 20)
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert_eq!(results[0].len(), 2);
    assert!(results.iter().all(|r| r == &results[0]));

    // With the file gone, only the cached copy can answer.
    let path = file.path().to_path_buf();
    file.close().unwrap();
    assert!(!path.exists());
    assert_eq!(dataset.search(&criteria, 20), results[0]);
    assert!(DemoDataset::from_path(&path).records().is_empty());
}
