//! ESG service - the operations behind the HTTP API
//!
//! Every call loads the collections it needs from the store, runs the ledger,
//! scoring or report logic in memory, and writes whole collections back.
//! Writers take a per-collection mutex for the full read/modify/write cycle,
//! so two requests in this process never interleave on the same collection.
//! Separate processes sharing a data directory are still last-writer-wins.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::dashboard::{self, DashboardView};
use crate::error::{EsgError, Result};
use crate::ledger::{ChainVerification, Ledger};
use crate::models::{
    ActivityInput, Category, Company, CompanyProfile, CompanyView, EsgActivity, Report, User,
};
use crate::report::{self, ReportRequest, ReportVerification};
use crate::scoring;
use crate::store::{self, Collection, RecordStore};

/// Query filter for listing activities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityFilter {
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
}

impl ActivityFilter {
    fn matches(&self, activity: &EsgActivity) -> bool {
        self.company_id
            .as_deref()
            .map_or(true, |id| activity.company_id == id)
            && self.category.map_or(true, |c| activity.category == c)
    }
}

pub struct EsgService {
    store: Arc<dyn RecordStore>,
    default_framework: String,
    default_period: String,
    recent_activities: usize,
    companies_lock: Mutex<()>,
    activities_lock: Mutex<()>,
    reports_lock: Mutex<()>,
}

impl EsgService {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            store,
            default_framework: config.reports.default_framework.clone(),
            default_period: config.reports.default_period.clone(),
            recent_activities: config.dashboard.recent_activities,
            companies_lock: Mutex::new(()),
            activities_lock: Mutex::new(()),
            reports_lock: Mutex::new(()),
        }
    }

    fn companies(&self) -> Vec<Company> {
        store::load(self.store.as_ref(), Collection::Companies)
    }

    fn ledger(&self) -> Ledger {
        Ledger::from_records(store::load(self.store.as_ref(), Collection::Activities))
    }

    fn reports(&self) -> Vec<Report> {
        store::load(self.store.as_ref(), Collection::Reports)
    }

    fn view(company: Company, ledger: &Ledger) -> CompanyView {
        let activities = ledger.for_company(&company.id);
        let esg_score = scoring::score(activities.clone());
        let total_activities = activities.count();
        CompanyView {
            company,
            esg_score,
            total_activities,
        }
    }

    // === Companies ===

    pub fn list_companies(&self) -> Vec<CompanyView> {
        let ledger = self.ledger();
        self.companies()
            .into_iter()
            .map(|c| Self::view(c, &ledger))
            .collect()
    }

    pub async fn create_company(&self, profile: CompanyProfile) -> Result<Company> {
        profile.validate()?;

        let _guard = self.companies_lock.lock().await;
        let mut companies = self.companies();

        let company = Company {
            id: uuid::Uuid::new_v4().to_string(),
            name: profile.name.trim().to_string(),
            industry: profile.industry,
            city: profile.city,
            framework: profile.framework,
            created_at: Utc::now(),
        };
        companies.push(company.clone());
        store::save(self.store.as_ref(), Collection::Companies, &companies)?;

        info!(company_id = %company.id, name = %company.name, "Registered company");
        Ok(company)
    }

    pub fn get_company(&self, company_id: &str) -> Result<CompanyView> {
        let company = self
            .companies()
            .into_iter()
            .find(|c| c.id == company_id)
            .ok_or_else(|| EsgError::company_not_found(company_id))?;
        Ok(Self::view(company, &self.ledger()))
    }

    // === Activities ===

    /// Matching activities, newest created first.
    pub fn list_activities(&self, filter: &ActivityFilter) -> Vec<EsgActivity> {
        let mut activities: Vec<EsgActivity> = self
            .ledger()
            .into_records()
            .into_iter()
            .rev()
            .filter(|a| filter.matches(a))
            .collect();
        // Stable, so equal timestamps keep latest-appended first
        activities.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activities
    }

    pub async fn append_activity(&self, input: ActivityInput) -> Result<EsgActivity> {
        input.validate()?;
        if !self.companies().iter().any(|c| c.id == input.company_id) {
            return Err(EsgError::company_not_found(&input.company_id));
        }

        let _guard = self.activities_lock.lock().await;
        let mut ledger = self.ledger();
        let activity = ledger.append(input)?;
        store::save(self.store.as_ref(), Collection::Activities, ledger.records())?;

        info!(
            activity_id = %activity.id,
            company_id = %activity.company_id,
            category = %activity.category,
            position = ledger.len() - 1,
            "Recorded activity"
        );
        Ok(activity)
    }

    pub fn verify_ledger(&self) -> ChainVerification {
        let result = self.ledger().verify();
        match &result.violation {
            Some(v) => warn!(
                index = v.index,
                activity_id = %v.activity_id,
                kind = ?v.kind,
                "Ledger verification failed"
            ),
            None => info!(length = result.length, "Ledger verified"),
        }
        result
    }

    // === Reports ===

    pub async fn generate_report(&self, request: ReportRequest) -> Result<Report> {
        let (framework, period) = request.resolve(&self.default_framework, &self.default_period);
        let report = report::generate(
            &self.companies(),
            &self.ledger(),
            &request.company_id,
            framework,
            period,
        )?;

        let _guard = self.reports_lock.lock().await;
        let mut reports = self.reports();
        reports.push(report.clone());
        store::save(self.store.as_ref(), Collection::Reports, &reports)?;

        Ok(report)
    }

    /// Reports, newest generated first, optionally for one company.
    pub fn list_reports(&self, company_id: Option<&str>) -> Vec<Report> {
        let mut reports: Vec<Report> = self
            .reports()
            .into_iter()
            .rev()
            .filter(|r| company_id.map_or(true, |id| r.company_id == id))
            .collect();
        reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        reports
    }

    pub fn get_report(&self, report_id: &str) -> Result<Report> {
        self.reports()
            .into_iter()
            .find(|r| r.id == report_id)
            .ok_or_else(|| EsgError::report_not_found(report_id))
    }

    pub fn verify_report(&self, report_id: &str) -> Result<ReportVerification> {
        let report = self.get_report(report_id)?;
        report::verify(&report, &self.ledger())
    }

    // === Dashboard ===

    pub fn dashboard(&self, company_id: &str) -> Result<DashboardView> {
        dashboard::summarize(
            &self.companies(),
            &self.ledger(),
            company_id,
            self.recent_activities,
        )
    }

    // === Users ===

    pub fn list_users(&self) -> Vec<User> {
        store::load(self.store.as_ref(), Collection::Users)
    }
}
