//! API route handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;

use super::SharedState;
use crate::dashboard::DashboardView;
use crate::error::EsgError;
use crate::ledger::ChainVerification;
use crate::models::{ActivityInput, Company, CompanyProfile, CompanyView, EsgActivity, Report, User};
use crate::report::{ReportRequest, ReportVerification};
use crate::service::ActivityFilter;

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    "OK"
}

// === Companies ===

/// GET /api/companies
pub async fn api_list_companies(State(svc): State<SharedState>) -> Json<Vec<CompanyView>> {
    Json(svc.list_companies())
}

/// POST /api/companies
pub async fn api_create_company(
    State(svc): State<SharedState>,
    Json(profile): Json<CompanyProfile>,
) -> Result<(StatusCode, Json<Company>), EsgError> {
    let company = svc.create_company(profile).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/:id
pub async fn api_get_company(
    State(svc): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyView>, EsgError> {
    Ok(Json(svc.get_company(&id)?))
}

// === Activities ===

/// GET /api/activities?company_id=..&category=..
pub async fn api_list_activities(
    State(svc): State<SharedState>,
    Query(filter): Query<ActivityFilter>,
) -> Json<Vec<EsgActivity>> {
    Json(svc.list_activities(&filter))
}

/// POST /api/activities
pub async fn api_append_activity(
    State(svc): State<SharedState>,
    Json(input): Json<ActivityInput>,
) -> Result<(StatusCode, Json<EsgActivity>), EsgError> {
    let activity = svc.append_activity(input).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

// === Reports ===

#[derive(Deserialize)]
pub struct ReportQuery {
    pub company_id: Option<String>,
}

/// GET /api/reports?company_id=..
pub async fn api_list_reports(
    State(svc): State<SharedState>,
    Query(query): Query<ReportQuery>,
) -> Json<Vec<Report>> {
    Json(svc.list_reports(query.company_id.as_deref()))
}

/// POST /api/reports
pub async fn api_generate_report(
    State(svc): State<SharedState>,
    Json(request): Json<ReportRequest>,
) -> Result<(StatusCode, Json<Report>), EsgError> {
    let report = svc.generate_report(request).await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// GET /api/reports/:id
pub async fn api_get_report(
    State(svc): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Report>, EsgError> {
    Ok(Json(svc.get_report(&id)?))
}

/// GET /api/reports/:id/verify
pub async fn api_verify_report(
    State(svc): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ReportVerification>, EsgError> {
    Ok(Json(svc.verify_report(&id)?))
}

// === Dashboard ===

/// GET /api/dashboard/:company_id
pub async fn api_dashboard(
    State(svc): State<SharedState>,
    Path(company_id): Path<String>,
) -> Result<Json<DashboardView>, EsgError> {
    Ok(Json(svc.dashboard(&company_id)?))
}

// === Ledger ===

/// GET /api/ledger/verify
pub async fn api_verify_ledger(State(svc): State<SharedState>) -> Json<ChainVerification> {
    Json(svc.verify_ledger())
}

// === Users ===

/// GET /api/users
pub async fn api_list_users(State(svc): State<SharedState>) -> Json<Vec<User>> {
    Json(svc.list_users())
}
