use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::extract::{ApiJson, ApiQuery};
use crate::{
    domain::report::{NarrationMode, ReportRequest, ReportResponse, ReportServiceApi},
    error::{AppError, AppResult},
    infrastructure::auth::AuthUser,
};

/// Query string for POST /api/reports
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    pub narrate: Option<String>,
}

impl GenerateQuery {
    fn mode(&self) -> AppResult<NarrationMode> {
        match self.narrate.as_deref().map(str::trim) {
            None | Some("") | Some("deferred") => Ok(NarrationMode::Deferred),
            Some("inline") => Ok(NarrationMode::Inline),
            Some(other) => Err(AppError::BadRequest(format!(
                "narrate must be 'inline' or 'deferred' (got '{}')",
                other
            ))),
        }
    }
}

pub struct ReportController {
    report_service: Arc<dyn ReportServiceApi>,
}

impl ReportController {
    pub fn new(report_service: Arc<dyn ReportServiceApi>) -> Self {
        Self { report_service }
    }

    /// POST /api/reports - Generate a report from field conditions
    pub async fn generate_report(
        State(controller): State<Arc<ReportController>>,
        Extension(auth_user): Extension<AuthUser>,
        ApiQuery(query): ApiQuery<GenerateQuery>,
        ApiJson(request): ApiJson<ReportRequest>,
    ) -> AppResult<(StatusCode, Json<ReportResponse>)> {
        let mode = query.mode()?;
        let report = controller
            .report_service
            .generate_report(&auth_user.user_id, request, mode)
            .await?;
        Ok((StatusCode::CREATED, Json(report.into())))
    }

    /// GET /api/reports - List the caller's most recent reports
    pub async fn list_reports(
        State(controller): State<Arc<ReportController>>,
        Extension(auth_user): Extension<AuthUser>,
    ) -> AppResult<Json<Vec<ReportResponse>>> {
        let reports = controller
            .report_service
            .list_reports(&auth_user.user_id)
            .await?;
        Ok(Json(reports.into_iter().map(ReportResponse::from).collect()))
    }

    /// GET /api/reports/{reportId} - Fetch one report
    pub async fn get_report(
        State(controller): State<Arc<ReportController>>,
        Extension(auth_user): Extension<AuthUser>,
        Path(report_id): Path<String>,
    ) -> AppResult<Json<ReportResponse>> {
        let report_id = Uuid::parse_str(&report_id)
            .map_err(|_| AppError::NotFound("Report not found".to_string()))?;
        let report = controller
            .report_service
            .get_report(&auth_user.user_id, report_id)
            .await?;
        Ok(Json(report.into()))
    }
}
