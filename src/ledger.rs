//! Hash chain ledger
//!
//! A single append-only log of ESG activities across all companies. Each
//! record carries the SHA-256 of its own canonical content and the hash of
//! the record appended immediately before it, so any edit to history breaks
//! either the record's own hash or the link from its successor.
//!
//! Per-company views are filtered from the log on demand; the log is the
//! only thing that is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::Result;
use crate::models::{ActivityInput, Category, EsgActivity};

/// prev_hash of the first activity ever appended
pub const GENESIS_PREV_HASH: &str = "0";

/// Hashed view of an activity: every field except `hash`, in a fixed order.
#[derive(Serialize)]
struct CanonicalActivity<'a> {
    id: &'a str,
    company_id: &'a str,
    category: Category,
    impact_score: Option<f64>,
    title: &'a str,
    description: Option<&'a str>,
    attributes: &'a BTreeMap<String, serde_json::Value>,
    created_at: &'a DateTime<Utc>,
    prev_hash: &'a str,
}

impl<'a> From<&'a EsgActivity> for CanonicalActivity<'a> {
    fn from(a: &'a EsgActivity) -> Self {
        Self {
            id: &a.id,
            company_id: &a.company_id,
            category: a.category,
            impact_score: a.impact_score,
            title: &a.title,
            description: a.description.as_deref(),
            attributes: &a.attributes,
            created_at: &a.created_at,
            prev_hash: &a.prev_hash,
        }
    }
}

/// SHA-256 (lowercase hex) of a value's canonical JSON encoding.
pub(crate) fn canonical_digest<T: Serialize>(value: &T) -> Result<String> {
    let mut hasher = Sha256::new();
    serde_json::to_writer(&mut hasher, value)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Recompute an activity's hash from its content.
pub fn activity_hash(activity: &EsgActivity) -> Result<String> {
    canonical_digest(&CanonicalActivity::from(activity))
}

/// Why a chain failed verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Stored hash does not match the record's content
    HashMismatch,
    /// prev_hash does not match the preceding record's hash
    BrokenLink,
}

/// First point at which the chain fails verification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainViolation {
    pub index: usize,
    pub activity_id: String,
    pub kind: ViolationKind,
}

/// Result of walking the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainVerification {
    pub valid: bool,
    pub length: usize,
    pub violation: Option<ChainViolation>,
}

/// The global activity log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    records: Vec<EsgActivity>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<EsgActivity>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EsgActivity] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EsgActivity> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Hash the next appended record links to
    pub fn tail_hash(&self) -> &str {
        self.records
            .last()
            .map(|r| r.hash.as_str())
            .unwrap_or(GENESIS_PREV_HASH)
    }

    pub fn get(&self, activity_id: &str) -> Option<&EsgActivity> {
        self.records.iter().find(|r| r.id == activity_id)
    }

    /// A company's activities in global append order
    pub fn for_company<'a>(
        &'a self,
        company_id: &'a str,
    ) -> impl DoubleEndedIterator<Item = &'a EsgActivity> + Clone + 'a {
        self.records.iter().filter(move |r| r.company_id == company_id)
    }

    /// Append an activity stamped with the current time.
    pub fn append(&mut self, input: ActivityInput) -> Result<EsgActivity> {
        self.append_at(input, Utc::now())
    }

    /// Append an activity with an explicit creation time.
    pub fn append_at(
        &mut self,
        input: ActivityInput,
        created_at: DateTime<Utc>,
    ) -> Result<EsgActivity> {
        input.validate()?;

        let mut activity = EsgActivity {
            id: uuid::Uuid::new_v4().to_string(),
            company_id: input.company_id,
            category: input.category,
            impact_score: input.impact_score,
            title: input.title,
            description: input.description,
            attributes: input.attributes,
            created_at,
            hash: String::new(),
            prev_hash: self.tail_hash().to_string(),
        };
        activity.hash = activity_hash(&activity)?;

        debug!(
            position = self.records.len(),
            activity_id = %activity.id,
            company_id = %activity.company_id,
            category = %activity.category,
            "Appended activity"
        );

        self.records.push(activity.clone());
        Ok(activity)
    }

    /// Walk the chain in append order and report the first violation.
    ///
    /// At each index the record's own hash is checked before its link.
    pub fn verify(&self) -> ChainVerification {
        let mut expected_prev = GENESIS_PREV_HASH;

        for (index, record) in self.records.iter().enumerate() {
            let kind = match activity_hash(record) {
                Ok(h) if h == record.hash => {
                    if record.prev_hash == expected_prev {
                        None
                    } else {
                        Some(ViolationKind::BrokenLink)
                    }
                }
                _ => Some(ViolationKind::HashMismatch),
            };

            if let Some(kind) = kind {
                return ChainVerification {
                    valid: false,
                    length: self.records.len(),
                    violation: Some(ChainViolation {
                        index,
                        activity_id: record.id.clone(),
                        kind,
                    }),
                };
            }
            expected_prev = record.hash.as_str();
        }

        ChainVerification {
            valid: true,
            length: self.records.len(),
            violation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(company: &str, category: Category, title: &str) -> ActivityInput {
        ActivityInput::new(company, category, title)
    }

    #[test]
    fn test_empty_ledger_is_valid() {
        let ledger = Ledger::new();
        let result = ledger.verify();
        assert!(result.valid);
        assert_eq!(result.length, 0);
        assert_eq!(ledger.tail_hash(), GENESIS_PREV_HASH);
    }

    #[test]
    fn test_first_activity_links_to_genesis() {
        let mut ledger = Ledger::new();
        let first = ledger
            .append(input("c1", Category::Environmental, "Solar roof"))
            .unwrap();

        assert_eq!(first.prev_hash, GENESIS_PREV_HASH);
        assert_eq!(first.hash.len(), 64);
        assert_eq!(activity_hash(&first).unwrap(), first.hash);
    }

    #[test]
    fn test_chain_holds_after_every_append() {
        let mut ledger = Ledger::new();
        let categories = [Category::Environmental, Category::Social, Category::Governance];

        for i in 0..12 {
            let company = if i % 2 == 0 { "c1" } else { "c2" };
            ledger
                .append(input(company, categories[i % 3], &format!("activity {}", i)))
                .unwrap();
            assert!(ledger.verify().valid, "chain broken after append {}", i);
        }

        let records = ledger.records();
        assert_eq!(records[0].prev_hash, GENESIS_PREV_HASH);
        for i in 1..records.len() {
            assert_eq!(records[i].prev_hash, records[i - 1].hash);
        }
    }

    #[test]
    fn test_links_follow_global_order_not_company_order() {
        let mut ledger = Ledger::new();
        let a = ledger.append(input("c1", Category::Social, "a")).unwrap();
        let b = ledger.append(input("c2", Category::Social, "b")).unwrap();
        let c = ledger.append(input("c1", Category::Social, "c")).unwrap();

        assert_eq!(b.prev_hash, a.hash);
        // c1's second activity links to c2's record, not to c1's previous one
        assert_eq!(c.prev_hash, b.hash);

        let ids: Vec<_> = ledger.for_company("c1").map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![a.id, c.id]);
    }

    #[test]
    fn test_edited_record_reports_hash_mismatch() {
        let mut ledger = Ledger::new();
        for i in 0..4 {
            ledger
                .append(input("c1", Category::Governance, &format!("policy {}", i)))
                .unwrap();
        }

        let mut records = ledger.into_records();
        records[2].impact_score = Some(10.0);
        let tampered = Ledger::from_records(records);

        let result = tampered.verify();
        assert!(!result.valid);
        let violation = result.violation.unwrap();
        assert_eq!(violation.index, 2);
        assert_eq!(violation.kind, ViolationKind::HashMismatch);
    }

    #[test]
    fn test_relinked_record_reports_broken_link() {
        let mut ledger = Ledger::new();
        for i in 0..3 {
            ledger
                .append(input("c1", Category::Environmental, &format!("step {}", i)))
                .unwrap();
        }

        let mut records = ledger.into_records();
        records[1].prev_hash = GENESIS_PREV_HASH.to_string();
        records[1].hash = activity_hash(&records[1]).unwrap();
        let tampered = Ledger::from_records(records);

        let violation = tampered.verify().violation.unwrap();
        assert_eq!(violation.index, 1);
        assert_eq!(violation.kind, ViolationKind::BrokenLink);
    }

    #[test]
    fn test_dropped_record_breaks_chain() {
        let mut ledger = Ledger::new();
        for i in 0..3 {
            ledger
                .append(input("c1", Category::Social, &format!("training {}", i)))
                .unwrap();
        }

        let mut records = ledger.into_records();
        records.remove(1);
        let result = Ledger::from_records(records).verify();

        assert_eq!(result.violation.unwrap().index, 1);
    }

    #[test]
    fn test_chain_survives_json_round_trip() {
        let mut ledger = Ledger::new();
        let mut with_attrs = input("c1", Category::Environmental, "Fleet electrification")
            .with_impact(7.3);
        with_attrs.description = Some("Replaced 12 diesel vans".to_string());
        with_attrs
            .attributes
            .insert("co2_tonnes".to_string(), serde_json::json!(41.25));
        with_attrs
            .attributes
            .insert("unit".to_string(), serde_json::json!("t"));
        ledger.append(with_attrs).unwrap();
        ledger.append(input("c2", Category::Social, "Volunteering")).unwrap();

        let json = serde_json::to_string_pretty(&ledger).unwrap();
        let restored: Ledger = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, ledger);
        assert!(restored.verify().valid);
    }

    #[test]
    fn test_invalid_input_is_not_appended() {
        let mut ledger = Ledger::new();
        let result = ledger.append(input("c1", Category::Social, ""));
        assert!(result.is_err());
        assert!(ledger.is_empty());
    }
}
