//! HTTP API for report submission and the monthly dashboard.
//!
//! Routes:
//! - `POST /api/report`: submit or overwrite a monthly report
//! - `GET /api/dashboard?month=YYYY-MM`: monthly totals
//! - `GET /health`: liveness probe

mod error;

pub use error::ApiError;

use crate::error::PortalError;
use crate::models::{MonthlySummary, Report, ReportSubmission, UpsertOutcome};
use crate::portal::ReportPortal;
use crate::store::{DynReportStore, ReportStore};
use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Portal shared between request handlers.
///
/// The mutex is held for the whole of each operation, which makes every
/// upsert atomic with respect to concurrent submissions for the same key.
pub type SharedPortal = Arc<Mutex<ReportPortal<DynReportStore>>>;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    message: &'static str,
    /// `created` or `updated`.
    status: &'static str,
    report: Report,
}

impl From<UpsertOutcome> for SubmitResponse {
    fn from(outcome: UpsertOutcome) -> Self {
        let status = outcome.label();
        let report = match outcome {
            UpsertOutcome::Created(report) | UpsertOutcome::Updated(report) => report,
        };
        Self {
            message: "Report submitted successfully",
            status,
            report,
        }
    }
}

async fn submit_report_handler(
    State(portal): State<SharedPortal>,
    payload: Result<Json<ReportSubmission>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(submission) = payload.map_err(|rejection| {
        debug!("Unreadable report body: {}", rejection.body_text());
        ApiError::MalformedBody(rejection.body_text())
    })?;

    let outcome = portal.lock().await.submit(&submission)?;
    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(outcome.into())))
}

async fn dashboard_handler(
    State(portal): State<SharedPortal>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<MonthlySummary>, ApiError> {
    let Some(month) = query.month else {
        return Err(PortalError::InvalidMonth(String::new()).into());
    };

    let summary = portal.lock().await.monthly_summary(&month)?;
    Ok(Json(summary))
}

async fn health_check_handler() -> &'static str {
    "OK"
}

/// Build the API router around a shared portal.
pub fn router(portal: SharedPortal) -> Router {
    Router::new()
        .route("/api/report", post(submit_report_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/health", get(health_check_handler))
        .with_state(portal)
}

/// Serve the API on `addr` until Ctrl-C.
pub async fn run_server(portal: ReportPortal<DynReportStore>, addr: SocketAddr) -> Result<()> {
    let report_count = portal
        .store()
        .len()
        .context("Failed to read report store")?;
    info!("Serving {} reports", report_count);

    let app = router(Arc::new(Mutex::new(portal)));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
