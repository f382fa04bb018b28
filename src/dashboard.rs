//! Dashboard aggregation - read-only summary of a company's ledger view

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{EsgError, Result};
use crate::ledger::Ledger;
use crate::models::{CategoryCounts, Company, CompanyId, EsgActivity};
use crate::scoring;

/// Number of recent activities shown when not configured
pub const DEFAULT_RECENT_ACTIVITIES: usize = 5;

/// Summary of a company's ESG position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub company_id: CompanyId,
    pub company_name: String,
    pub esg_score: u32,
    pub total_activities: usize,
    pub category_counts: CategoryCounts,
    /// Most recently appended activities, newest first
    pub recent_activities: Vec<EsgActivity>,
    /// Activity count per "YYYY-MM" creation month
    pub monthly_trend: BTreeMap<String, usize>,
}

fn month_key(activity: &EsgActivity) -> String {
    activity.created_at.format("%Y-%m").to_string()
}

pub fn summarize(
    companies: &[Company],
    ledger: &Ledger,
    company_id: &str,
    recent_limit: usize,
) -> Result<DashboardView> {
    let company = companies
        .iter()
        .find(|c| c.id == company_id)
        .ok_or_else(|| EsgError::company_not_found(company_id))?;

    let activities = ledger.for_company(company_id);

    let mut monthly_trend = BTreeMap::new();
    for activity in activities.clone() {
        *monthly_trend.entry(month_key(activity)).or_insert(0) += 1;
    }

    Ok(DashboardView {
        company_id: company.id.clone(),
        company_name: company.name.clone(),
        esg_score: scoring::score(activities.clone()),
        total_activities: activities.clone().count(),
        category_counts: scoring::category_counts(activities.clone()),
        recent_activities: activities.rev().take(recent_limit).cloned().collect(),
        monthly_trend,
    })
}
