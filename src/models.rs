//! Ledger models - shared record types
//!
//! Companies, ESG activities, reports and users as they are persisted in
//! their collections, plus the request inputs that create them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EsgError, Result};

/// Unique identifier for a company
pub type CompanyId = String;

/// Unique identifier for a ledger activity
pub type ActivityId = String;

/// Per-category activity counts; only categories with at least one activity appear
pub type CategoryCounts = BTreeMap<Category, usize>;

//=============================================================================
// CATEGORIES
//=============================================================================

/// ESG pillar an activity contributes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Environmental,
    Social,
    Governance,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Environmental,
        Category::Social,
        Category::Governance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Environmental => "environmental",
            Category::Social => "social",
            Category::Governance => "governance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//=============================================================================
// COMPANIES
//=============================================================================

/// A registered company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    /// Preferred reporting framework (GRI, SASB, TCFD, ...)
    #[serde(default)]
    pub framework: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile fields supplied when registering a company
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub framework: Option<String>,
}

impl CompanyProfile {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EsgError::Validation("company name is required".to_string()));
        }
        Ok(())
    }
}

/// Company augmented with values derived from the ledger at read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyView {
    #[serde(flatten)]
    pub company: Company,
    pub esg_score: u32,
    pub total_activities: usize,
}

//=============================================================================
// ACTIVITIES
//=============================================================================

/// Fields supplied by the caller when recording an activity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityInput {
    pub company_id: CompanyId,
    pub category: Category,
    #[serde(default)]
    pub impact_score: Option<f64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Free-form descriptive fields (metric, unit, evidence link, ...)
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ActivityInput {
    pub fn new(company_id: impl Into<String>, category: Category, title: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            category,
            impact_score: None,
            title: title.into(),
            description: None,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_impact(mut self, impact_score: f64) -> Self {
        self.impact_score = Some(impact_score);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.company_id.trim().is_empty() {
            return Err(EsgError::Validation("company_id is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(EsgError::Validation("title is required".to_string()));
        }
        if let Some(score) = self.impact_score {
            if !score.is_finite() || score < 0.0 {
                return Err(EsgError::Validation(format!(
                    "impact_score must be a non-negative number, got {}",
                    score
                )));
            }
        }
        Ok(())
    }
}

/// A hash-chained ESG activity record. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsgActivity {
    pub id: ActivityId,
    pub company_id: CompanyId,
    pub category: Category,
    #[serde(default)]
    pub impact_score: Option<f64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    /// SHA-256 over every other field, prev_hash included
    pub hash: String,
    /// Hash of the previous activity in global append order, "0" for the first
    pub prev_hash: String,
}

//=============================================================================
// REPORTS
//=============================================================================

/// A sealed point-in-time compliance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub company_id: CompanyId,
    pub company_name: String,
    pub framework: String,
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub esg_score: u32,
    pub total_activities: usize,
    pub category_counts: CategoryCounts,
    /// Activities the seal covers, in append order
    pub activity_ids: Vec<ActivityId>,
    /// Seal over company id, framework, period and the activity records
    pub hash: String,
}

//=============================================================================
// USERS
//=============================================================================

/// A user record. Carried in its own collection; no auth semantics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}
