//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Both analysis endpoints funnel into [`run_analysis_pipeline`], which is the
//! linear, non-branching sequence the service exists for:
//! validate → rate limit → sanitize → model call → parse → schema check → persist.

use axum::{
    extract::rejection::JsonRejection,
    extract::{Extension, Multipart, State},
    response::Json,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

use crate::error::ApiError;
use crate::web::rate_limit::enforce_rate_limit;
use crate::web::state::AppState;
use stress_analysis_core::domain::{AnalysisRecord, AuthenticatedUser};
use stress_analysis_core::extract::extract_text;
use stress_analysis_core::report::{parse_completion, validate_report};
use stress_analysis_core::sanitize::sanitize_content;
use stress_analysis_core::validate::{validate_request, ValidationError};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(analyze_handler, analyze_upload_handler, list_analyses_handler),
    components(schemas(AnalyzeRequestBody, AnalyzeResponse, ListAnalysesResponse)),
    tags(
        (name = "Portfolio Stress Analysis API", description = "API endpoints for AI-backed academic stress analysis.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

/// The JSON body accepted by `POST /analyze`.
///
/// Documented for the OpenAPI spec; the handler reads the raw JSON value so
/// that a present-but-wrong-typed field is reported through the same
/// validation path as a missing one.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct AnalyzeRequestBody {
    pub file_content: Option<String>,
    pub file_name: Option<String>,
    pub student_name: Option<String>,
}

/// The payload returned after a successful analysis.
#[derive(Serialize, ToSchema)]
pub struct AnalyzeResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub analysis: AnalysisRecord,
}

/// The payload returned by `GET /analyses`.
#[derive(Serialize, ToSchema)]
pub struct ListAnalysesResponse {
    #[schema(value_type = Vec<Object>)]
    pub analyses: Vec<AnalysisRecord>,
}

/// How many rows `GET /analyses` returns at most.
const LIST_LIMIT: i64 = 20;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Analyze a pre-extracted document.
///
/// Runs the full pipeline against text the client already extracted from the
/// uploaded file.
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequestBody,
    responses(
        (status = 200, description = "Analysis complete", body = AnalyzeResponse),
        (status = 400, description = "Malformed or oversized input"),
        (status = 401, description = "Missing or invalid bearer credential"),
        (status = 402, description = "Upstream AI credits exhausted"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "AI call, parsing, or storage failure")
    )
)]
pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::MalformedBody)?;

    // For the two required fields a wrong JSON type is treated the same as
    // an absent one; the validator turns both into the matching 400. The
    // optional student name is different: absent is fine, but a present
    // non-string value is rejected rather than silently analyzed as
    // "Anonymous".
    let file_content = string_field(&body, "fileContent");
    let file_name = string_field(&body, "fileName");
    let student_name = match body.get("studentName") {
        Some(value) if !value.is_null() => Some(
            value
                .as_str()
                .map(str::to_string)
                .ok_or(ValidationError::StudentNameNotAString)?,
        ),
        _ => None,
    };

    let record = run_analysis_pipeline(&state, &user, file_content, file_name, student_name).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: record,
    }))
}

/// Analyze a raw uploaded file.
///
/// Accepts a multipart/form-data request with a file part and an optional
/// `student_name` text part. The server performs the same best-effort text
/// extraction the browser client does, then runs the identical pipeline.
#[utoipa::path(
    post,
    path = "/analyze/upload",
    request_body(content_type = "multipart/form-data", description = "The document to analyze."),
    responses(
        (status = 200, description = "Analysis complete", body = AnalyzeResponse),
        (status = 400, description = "Missing file or oversized input"),
        (status = 401, description = "Missing or invalid bearer credential"),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "AI call, parsing, or storage failure")
    )
)]
pub async fn analyze_upload_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let mut student_name: Option<String> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read multipart data: {e}")))?
    {
        if field.name() == Some("student_name") {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::Internal(format!("Failed to read form field: {e}")))?;
            student_name = Some(text);
        } else {
            let name = field.file_name().unwrap_or("untitled.txt").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::Internal(format!("Failed to read file bytes: {e}")))?;
            upload = Some((name, data.to_vec()));
        }
    }

    let (file_name, data) =
        upload.ok_or(ApiError::Validation(ValidationError::MissingFileContent))?;
    let text = extract_text(&data, &file_name);

    let record =
        run_analysis_pipeline(&state, &user, Some(text), Some(file_name), student_name).await?;
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: record,
    }))
}

/// List the caller's most recent analyses, newest first.
#[utoipa::path(
    get,
    path = "/analyses",
    responses(
        (status = 200, description = "The caller's recent analyses", body = ListAnalysesResponse),
        (status = 401, description = "Missing or invalid bearer credential"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_analyses_handler(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ListAnalysesResponse>, ApiError> {
    let analyses = state.store.list_for_user(&user.user_id, LIST_LIMIT).await?;
    Ok(Json(ListAnalysesResponse { analyses }))
}

//=========================================================================================
// The Pipeline
//=========================================================================================

/// One linear pass: validate → rate limit → sanitize → model call → parse →
/// schema check → persist. Any failure aborts the whole request; nothing is
/// retried and nothing partial is stored.
async fn run_analysis_pipeline(
    state: &AppState,
    user: &AuthenticatedUser,
    file_content: Option<String>,
    file_name: Option<String>,
    student_name: Option<String>,
) -> Result<AnalysisRecord, ApiError> {
    let request = validate_request(file_content, file_name, student_name)?;

    enforce_rate_limit(
        state.store.as_ref(),
        &user.user_id,
        state.config.rate_limit_max_requests,
        Duration::seconds(state.config.rate_limit_window_secs as i64),
    )
    .await?;

    let safe_content = sanitize_content(&request.document_text);
    info!(
        file_name = %request.file_name,
        content_chars = request.document_text.chars().count(),
        prompt_chars = safe_content.chars().count(),
        "Requesting analysis"
    );

    let completion = state
        .completion
        .request_analysis(
            request.student_name.as_deref().unwrap_or("Anonymous"),
            &request.file_name,
            &safe_content,
        )
        .await?;

    let parsed = parse_completion(&completion)?;
    let report = validate_report(parsed)?;

    let record = state.store.insert_analysis(user, &request, &report).await?;
    Ok(record)
}

fn string_field(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}
