use crate::infrastructure::db::DbPool;
use crate::{
    domain::report::{NarrationPatch, NewReport, Report},
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Keyed report store. Reports are addressed by `(user_id, report_id)`.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Persist a new report; the store assigns its identity
    async fn create(&self, user_id: &str, report: &NewReport) -> AppResult<Report>;

    async fn find(&self, user_id: &str, report_id: Uuid) -> AppResult<Option<Report>>;

    /// Most recent reports first
    async fn list_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<Report>>;

    /// Overwrite the narration fields only, leaving every other field untouched.
    /// Last write wins; there is no version check.
    async fn patch_narration(
        &self,
        user_id: &str,
        report_id: Uuid,
        patch: &NarrationPatch,
    ) -> AppResult<()>;
}

pub struct PgReportRepository {
    pool: Arc<DbPool>,
}

impl PgReportRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn create(&self, user_id: &str, report: &NewReport) -> AppResult<Report> {
        let pool = self.pool.as_ref();
        let now = chrono::Utc::now();

        let created = sqlx::query_as::<_, Report>(
            r#"
            INSERT INTO reports (
                id, user_id, parcelle_id, parcelle_name, status, summary,
                recommendations, weather, audio_url, darija_script, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING id, user_id, parcelle_id, parcelle_name, status, summary,
                      recommendations, weather, audio_url, darija_script, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&report.parcelle_id)
        .bind(&report.parcelle_name)
        .bind(report.status)
        .bind(&report.summary)
        .bind(&report.recommendations)
        .bind(&report.weather)
        .bind(&report.audio_url)
        .bind(&report.darija_script)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(created)
    }

    async fn find(&self, user_id: &str, report_id: Uuid) -> AppResult<Option<Report>> {
        let pool = self.pool.as_ref();
        let report = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, user_id, parcelle_id, parcelle_name, status, summary,
                   recommendations, weather, audio_url, darija_script, created_at, updated_at
            FROM reports
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(report_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(report)
    }

    async fn list_by_user(&self, user_id: &str, limit: i64) -> AppResult<Vec<Report>> {
        let pool = self.pool.as_ref();
        let reports = sqlx::query_as::<_, Report>(
            r#"
            SELECT id, user_id, parcelle_id, parcelle_name, status, summary,
                   recommendations, weather, audio_url, darija_script, created_at, updated_at
            FROM reports
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(reports)
    }

    async fn patch_narration(
        &self,
        user_id: &str,
        report_id: Uuid,
        patch: &NarrationPatch,
    ) -> AppResult<()> {
        let pool = self.pool.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE reports
            SET audio_url = $1, darija_script = $2, updated_at = $3
            WHERE id = $4 AND user_id = $5
            "#,
        )
        .bind(&patch.audio_url)
        .bind(&patch.darija_script)
        .bind(chrono::Utc::now())
        .bind(report_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Report not found".to_string()));
        }

        Ok(())
    }
}
