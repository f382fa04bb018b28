//! Report generation
//!
//! A report snapshots a company's activities at generation time and seals
//! them with a content hash over `{company_id, framework, period,
//! activities}`. Regenerating after the ledger grows yields a different
//! seal, and a stored report can be checked against the current ledger.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EsgError, Result};
use crate::ledger::{canonical_digest, Ledger};
use crate::models::{ActivityId, Company, CompanyId, EsgActivity, Report};
use crate::scoring;

/// Framework used when the caller does not name one
pub const DEFAULT_FRAMEWORK: &str = "GRI";

/// Period used when the caller does not name one
pub const DEFAULT_PERIOD: &str = "2024";

/// Request to generate a report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportRequest {
    pub company_id: CompanyId,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
}

impl ReportRequest {
    pub fn new(company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            framework: None,
            period: None,
        }
    }

    /// Framework and period, falling back to the given defaults for missing
    /// or blank values.
    pub fn resolve<'a>(&'a self, framework: &'a str, period: &'a str) -> (&'a str, &'a str) {
        fn pick<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
            match value.as_deref().map(str::trim) {
                Some(v) if !v.is_empty() => v,
                _ => fallback,
            }
        }
        (pick(&self.framework, framework), pick(&self.period, period))
    }
}

#[derive(Serialize)]
struct ReportSeal<'a> {
    company_id: &'a str,
    framework: &'a str,
    period: &'a str,
    activities: &'a [&'a EsgActivity],
}

fn seal(
    company_id: &str,
    framework: &str,
    period: &str,
    activities: &[&EsgActivity],
) -> Result<String> {
    canonical_digest(&ReportSeal {
        company_id,
        framework,
        period,
        activities,
    })
}

/// Build a report for `company_id` from the company's current activities.
pub fn generate(
    companies: &[Company],
    ledger: &Ledger,
    company_id: &str,
    framework: &str,
    period: &str,
) -> Result<Report> {
    let company = companies
        .iter()
        .find(|c| c.id == company_id)
        .ok_or_else(|| EsgError::company_not_found(company_id))?;

    let activities: Vec<&EsgActivity> = ledger.for_company(company_id).collect();
    let hash = seal(company_id, framework, period, &activities)?;

    let report = Report {
        id: uuid::Uuid::new_v4().to_string(),
        company_id: company.id.clone(),
        company_name: company.name.clone(),
        framework: framework.to_string(),
        period: period.to_string(),
        generated_at: Utc::now(),
        esg_score: scoring::score(activities.iter().copied()),
        total_activities: activities.len(),
        category_counts: scoring::category_counts(activities.iter().copied()),
        activity_ids: activities.iter().map(|a| a.id.clone()).collect(),
        hash,
    };

    info!(
        report_id = %report.id,
        company_id = %report.company_id,
        framework = %report.framework,
        period = %report.period,
        activities = report.total_activities,
        score = report.esg_score,
        "Generated report"
    );

    Ok(report)
}

/// Outcome of checking a stored report against the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVerification {
    pub report_id: String,
    /// Seal recomputed over the referenced activities matches the stored one
    pub seal_valid: bool,
    /// Referenced activities no longer present in the ledger
    pub missing_activities: Vec<ActivityId>,
    /// The company's activity set is unchanged since generation
    pub current: bool,
}

/// Recompute a report's seal from the activities it references.
pub fn verify(report: &Report, ledger: &Ledger) -> Result<ReportVerification> {
    let mut found = Vec::with_capacity(report.activity_ids.len());
    let mut missing = Vec::new();
    for id in &report.activity_ids {
        match ledger.get(id) {
            Some(activity) if activity.company_id == report.company_id => found.push(activity),
            _ => missing.push(id.clone()),
        }
    }

    let seal_valid = missing.is_empty()
        && seal(&report.company_id, &report.framework, &report.period, &found)? == report.hash;

    let current = ledger
        .for_company(&report.company_id)
        .map(|a| &a.id)
        .eq(report.activity_ids.iter());

    Ok(ReportVerification {
        report_id: report.id.clone(),
        seal_valid,
        missing_activities: missing,
        current,
    })
}
