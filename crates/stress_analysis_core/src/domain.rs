//! crates/stress_analysis_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database; the serde derives exist
//! only because the analysis model is contracted to emit these JSON shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A request that has passed input validation.
///
/// `document_text` is the validated but unsanitized text; the prompt-safe
/// variant is produced separately by the content sanitizer so the original
/// can still be persisted alongside the analysis.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub document_text: String,
    pub file_name: String,
    pub student_name: Option<String>,
}

/// The identity resolved from a bearer credential for the lifetime of one
/// request. The id is an opaque subject string issued by the external
/// identity service; this pipeline only ever uses it as a foreign key.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Overall stress classification emitted by the analysis model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

/// Severity of a predicted stress-related health issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// Emotional indicators extracted from the document, each scored 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionalTone {
    pub confidence: f64,
    pub anxiety: f64,
    pub motivation: f64,
    pub overwhelm: f64,
    #[serde(default)]
    pub primary_emotion: String,
}

/// One stress-related health issue predicted by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthIssue {
    pub issue: String,
    pub description: String,
    pub severity: Severity,
}

/// The validated analysis produced by the external model.
///
/// Promotion from the model's raw JSON to this struct only happens after the
/// field-by-field checks in [`crate::report`]; nothing downstream is allowed
/// to touch the raw completion. The sections whose inner shape is
/// presentational (`workload_indicators`, `performance_trends`,
/// `engagement_patterns`, `study_schedule`) are carried as JSON values after
/// a shallow shape check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub stress_level: StressLevel,
    pub stress_score: f64,
    pub emotional_tone: EmotionalTone,
    pub workload_indicators: Value,
    pub performance_trends: Value,
    pub engagement_patterns: Value,
    pub stress_causes: Vec<String>,
    pub study_schedule: Value,
    pub stress_tips: Vec<String>,
    pub health_issues: Vec<HealthIssue>,
    pub analysis_summary: String,
}

/// One persisted analysis row, exactly as stored and returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub user_id: String,
    pub student_name: Option<String>,
    pub file_name: String,
    pub file_content: String,
    pub stress_level: StressLevel,
    pub stress_score: f64,
    pub emotional_tone: Value,
    pub workload_indicators: Value,
    pub performance_trends: Value,
    pub engagement_patterns: Value,
    pub stress_causes: Value,
    pub study_schedule: Value,
    pub stress_tips: Value,
    pub health_issues: Value,
    pub analysis_summary: String,
    pub created_at: DateTime<Utc>,
}
