//! HTTP API - maps routes onto the ESG service
//!
//! Provides:
//! - Company registration and lookup
//! - Activity recording and listing
//! - Report generation and verification
//! - Dashboard summaries
//! - Ledger verification

pub mod routes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::EsgError;
use crate::service::EsgService;

pub type SharedState = Arc<EsgService>;

/// Create the API router
pub fn create_router(state: SharedState, static_dir: &Path) -> Router {
    Router::new()
        // Companies
        .route(
            "/api/companies",
            get(routes::api_list_companies).post(routes::api_create_company),
        )
        .route("/api/companies/:id", get(routes::api_get_company))
        // Activities
        .route(
            "/api/activities",
            get(routes::api_list_activities).post(routes::api_append_activity),
        )
        // Reports
        .route(
            "/api/reports",
            get(routes::api_list_reports).post(routes::api_generate_report),
        )
        .route("/api/reports/:id", get(routes::api_get_report))
        .route("/api/reports/:id/verify", get(routes::api_verify_report))
        // Dashboard
        .route("/api/dashboard/:company_id", get(routes::api_dashboard))
        // Ledger
        .route("/api/ledger/verify", get(routes::api_verify_ledger))
        // Users
        .route("/api/users", get(routes::api_list_users))
        // Health check
        .route("/health", get(routes::health))
        // Static files
        .nest_service("/static", tower_http::services::ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

impl IntoResponse for EsgError {
    fn into_response(self) -> Response {
        let status = match &self {
            EsgError::NotFound { .. } => StatusCode::NOT_FOUND,
            EsgError::Validation(_) => StatusCode::BAD_REQUEST,
            EsgError::Persistence { .. } | EsgError::DataDir { .. } | EsgError::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
