//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `AnalysisStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use stress_analysis_core::domain::{
    AnalysisRecord, AnalysisReport, AnalysisRequest, AuthenticatedUser, StressLevel,
};
use stress_analysis_core::ports::{AnalysisStore, PortError, PortResult};
use stress_analysis_core::sanitize::truncate_chars;

/// The stored copy of the original document is capped independently of the
/// prompt bound; a row never carries more than this many characters of text.
const MAX_STORED_CONTENT_CHARS: usize = 50_000;

const INSERT_ANALYSIS_SQL: &str = "\
    INSERT INTO portfolio_analyses (
        id, user_id, student_name, file_name, file_content,
        stress_level, stress_score, emotional_tone, workload_indicators,
        performance_trends, engagement_patterns, stress_causes, study_schedule,
        stress_tips, health_issues, analysis_summary
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
    RETURNING id, user_id, student_name, file_name, file_content,
              stress_level, stress_score, emotional_tone, workload_indicators,
              performance_trends, engagement_patterns, stress_causes, study_schedule,
              stress_tips, health_issues, analysis_summary, created_at";

const SELECT_ANALYSES_SQL: &str = "\
    SELECT id, user_id, student_name, file_name, file_content,
           stress_level, stress_score, emotional_tone, workload_indicators,
           performance_trends, engagement_patterns, stress_causes, study_schedule,
           stress_tips, health_issues, analysis_summary, created_at
    FROM portfolio_analyses
    WHERE user_id = $1
    ORDER BY created_at DESC
    LIMIT $2";

const COUNT_SINCE_SQL: &str = "\
    SELECT COUNT(*) FROM portfolio_analyses WHERE user_id = $1 AND created_at >= $2";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `AnalysisStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AnalysisRow {
    id: Uuid,
    user_id: String,
    student_name: Option<String>,
    file_name: String,
    file_content: String,
    stress_level: String,
    stress_score: f64,
    emotional_tone: Value,
    workload_indicators: Value,
    performance_trends: Value,
    engagement_patterns: Value,
    stress_causes: Value,
    study_schedule: Value,
    stress_tips: Value,
    health_issues: Value,
    analysis_summary: String,
    created_at: DateTime<Utc>,
}

impl AnalysisRow {
    fn to_domain(self) -> PortResult<AnalysisRecord> {
        let stress_level = match self.stress_level.as_str() {
            "low" => StressLevel::Low,
            "moderate" => StressLevel::Moderate,
            "high" => StressLevel::High,
            other => {
                return Err(PortError::Unexpected(format!(
                    "Row {} carries unknown stress_level '{}'",
                    self.id, other
                )))
            }
        };
        Ok(AnalysisRecord {
            id: self.id,
            user_id: self.user_id,
            student_name: self.student_name,
            file_name: self.file_name,
            file_content: self.file_content,
            stress_level,
            stress_score: self.stress_score,
            emotional_tone: self.emotional_tone,
            workload_indicators: self.workload_indicators,
            performance_trends: self.performance_trends,
            engagement_patterns: self.engagement_patterns,
            stress_causes: self.stress_causes,
            study_schedule: self.study_schedule,
            stress_tips: self.stress_tips,
            health_issues: self.health_issues,
            analysis_summary: self.analysis_summary,
            created_at: self.created_at,
        })
    }
}

fn stress_level_as_str(level: StressLevel) -> &'static str {
    match level {
        StressLevel::Low => "low",
        StressLevel::Moderate => "moderate",
        StressLevel::High => "high",
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> PortResult<Value> {
    serde_json::to_value(value).map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `AnalysisStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AnalysisStore for DbAdapter {
    async fn insert_analysis(
        &self,
        user: &AuthenticatedUser,
        request: &AnalysisRequest,
        report: &AnalysisReport,
    ) -> PortResult<AnalysisRecord> {
        let row = sqlx::query_as::<_, AnalysisRow>(INSERT_ANALYSIS_SQL)
            .bind(Uuid::new_v4())
            .bind(&user.user_id)
            .bind(&request.student_name)
            .bind(&request.file_name)
            .bind(truncate_chars(&request.document_text, MAX_STORED_CONTENT_CHARS))
            .bind(stress_level_as_str(report.stress_level))
            .bind(report.stress_score)
            .bind(to_json(&report.emotional_tone)?)
            .bind(&report.workload_indicators)
            .bind(&report.performance_trends)
            .bind(&report.engagement_patterns)
            .bind(to_json(&report.stress_causes)?)
            .bind(&report.study_schedule)
            .bind(to_json(&report.stress_tips)?)
            .bind(to_json(&report.health_issues)?)
            .bind(&report.analysis_summary)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        row.to_domain()
    }

    async fn count_since(&self, user_id: &str, since: DateTime<Utc>) -> PortResult<i64> {
        sqlx::query_scalar::<_, i64>(COUNT_SINCE_SQL)
            .bind(user_id)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    async fn list_for_user(&self, user_id: &str, limit: i64) -> PortResult<Vec<AnalysisRecord>> {
        let rows = sqlx::query_as::<_, AnalysisRow>(SELECT_ANALYSES_SQL)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        rows.into_iter().map(AnalysisRow::to_domain).collect()
    }
}
