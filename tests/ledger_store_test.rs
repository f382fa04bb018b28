//! Ledger persistence integration tests
//!
//! Tests the activity chain as it lives on disk:
//! - Chain survives reopening the data directory
//! - Edits to the activities file are detected
//! - Corrupt collections read as empty

use std::sync::Arc;

use serde_json::Value;
use tempfile::TempDir;

use esg_ledger::config::Config;
use esg_ledger::ledger::{ViolationKind, GENESIS_PREV_HASH};
use esg_ledger::models::{ActivityInput, Category, CompanyProfile};
use esg_ledger::service::ActivityFilter;
use esg_ledger::store::{self, Collection, JsonFileStore};
use esg_ledger::EsgService;

fn open(dir: &TempDir) -> (EsgService, std::path::PathBuf) {
    let store = JsonFileStore::open(dir.path()).unwrap();
    store::bootstrap(&store).unwrap();
    let activities_path = store.path_for(Collection::Activities);
    (
        EsgService::new(Arc::new(store), &Config::default()),
        activities_path,
    )
}

async fn seed(svc: &EsgService, count: usize) -> String {
    let company = svc
        .create_company(CompanyProfile {
            name: "Nordic Timber".to_string(),
            industry: Some("Forestry".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    for i in 0..count {
        let category = Category::ALL[i % 3];
        let mut input = ActivityInput::new(&company.id, category, format!("activity {}", i))
            .with_impact(i as f64 + 0.5);
        input
            .attributes
            .insert("site".to_string(), serde_json::json!(format!("mill-{}", i)));
        svc.append_activity(input).await.unwrap();
    }
    company.id
}

#[tokio::test]
async fn test_chain_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let company_id = {
        let (svc, _) = open(&dir);
        seed(&svc, 6).await
    };

    let (svc, path) = open(&dir);
    let verification = svc.verify_ledger();
    assert!(verification.valid);
    assert_eq!(verification.length, 6);

    // Appending after reopen links to the persisted tail
    let raw: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    let tail = raw.last().unwrap()["hash"].as_str().unwrap().to_string();
    let next = svc
        .append_activity(ActivityInput::new(&company_id, Category::Social, "after restart"))
        .await
        .unwrap();
    assert_eq!(next.prev_hash, tail);
    assert!(svc.verify_ledger().valid);
}

#[tokio::test]
async fn test_first_persisted_activity_links_to_genesis() {
    let dir = TempDir::new().unwrap();
    let (svc, path) = open(&dir);
    seed(&svc, 1).await;

    let raw: Vec<Value> = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0]["prev_hash"], GENESIS_PREV_HASH);
}

#[tokio::test]
async fn test_edited_file_detected() {
    let dir = TempDir::new().unwrap();
    let (svc, path) = open(&dir);
    seed(&svc, 5).await;

    let mut raw: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    raw[3]["impact_score"] = serde_json::json!(99.0);
    std::fs::write(&path, serde_json::to_vec_pretty(&raw).unwrap()).unwrap();

    let verification = svc.verify_ledger();
    assert!(!verification.valid);
    let violation = verification.violation.unwrap();
    assert_eq!(violation.index, 3);
    assert_eq!(violation.kind, ViolationKind::HashMismatch);
}

#[tokio::test]
async fn test_report_detects_rewritten_history() {
    let dir = TempDir::new().unwrap();
    let (svc, path) = open(&dir);
    let company_id = seed(&svc, 3).await;

    let report = svc
        .generate_report(esg_ledger::report::ReportRequest::new(&company_id))
        .await
        .unwrap();
    assert!(svc.verify_report(&report.id).unwrap().seal_valid);

    let mut raw: Vec<Value> = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    raw[0]["title"] = serde_json::json!("rewritten");
    std::fs::write(&path, serde_json::to_vec_pretty(&raw).unwrap()).unwrap();

    assert!(!svc.verify_report(&report.id).unwrap().seal_valid);
}

#[tokio::test]
async fn test_corrupt_companies_file_reads_empty() {
    let dir = TempDir::new().unwrap();
    let (svc, _) = open(&dir);
    seed(&svc, 1).await;

    std::fs::write(dir.path().join("companies.json"), b"[{ truncated").unwrap();

    assert!(svc.list_companies().is_empty());
    // Activities are a separate collection and still load
    assert_eq!(svc.list_activities(&ActivityFilter::default()).len(), 1);
}
