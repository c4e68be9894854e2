//! crates/stress_analysis_core/src/report.rs
//!
//! Turns the raw completion text returned by the analysis model into a
//! trusted [`AnalysisReport`].
//!
//! The model output is an untrusted bag of fields. It is parsed (unwrapping
//! a markdown fence if the model added one) and then checked field by field;
//! only after every check passes is the value promoted to the typed report.
//! On any failure the whole request is rejected; partial results are never
//! persisted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::domain::AnalysisReport;

/// A failure while interpreting the model's completion. Both variants are
/// surfaced to the caller as a generic failure; the detail is for logs only.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("completion is not valid JSON: {0}")]
    Parse(String),
    #[error("analysis failed validation: {0}")]
    Schema(String),
}

// Models sometimes wrap JSON output in a fenced block despite the prompt;
// when they do, only the interior is parsed.
static RE_FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[a-zA-Z]+)?\s*(.*?)```").unwrap());

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];
const DAY_BLOCKS: [&str; 3] = ["morning", "afternoon", "evening"];
const TONE_FIELDS: [&str; 4] = ["confidence", "anxiety", "motivation", "overwhelm"];

/// Parses the completion text as JSON, looking inside a fenced code block
/// first if one is present.
pub fn parse_completion(completion: &str) -> Result<Value, ReportError> {
    let body = match RE_FENCED_BLOCK.captures(completion) {
        Some(caps) => caps[1].to_string(),
        None => completion.to_string(),
    };
    serde_json::from_str(body.trim()).map_err(|e| ReportError::Parse(e.to_string()))
}

/// Confirms the parsed object conforms to the expected analysis shape and
/// promotes it to the typed report.
pub fn validate_report(value: Value) -> Result<AnalysisReport, ReportError> {
    let obj = value
        .as_object()
        .ok_or_else(|| schema("analysis is not a JSON object"))?;

    match obj.get("stress_level").and_then(Value::as_str) {
        Some("low" | "moderate" | "high") => {}
        _ => return Err(schema("stress_level must be one of low, moderate, high")),
    }

    let score = obj
        .get("stress_score")
        .and_then(Value::as_f64)
        .ok_or_else(|| schema("stress_score must be a number"))?;
    if !(0.0..=100.0).contains(&score) {
        return Err(schema("stress_score must be between 0 and 100"));
    }

    let tone = obj
        .get("emotional_tone")
        .and_then(Value::as_object)
        .ok_or_else(|| schema("emotional_tone is missing"))?;
    for field in TONE_FIELDS {
        let n = tone
            .get(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| schema(&format!("emotional_tone.{field} must be a number")))?;
        if !(0.0..=100.0).contains(&n) {
            return Err(schema(&format!(
                "emotional_tone.{field} must be between 0 and 100"
            )));
        }
    }

    for field in ["stress_causes", "stress_tips", "health_issues"] {
        if !obj.get(field).is_some_and(Value::is_array) {
            return Err(schema(&format!("{field} must be a list")));
        }
    }

    for (index, entry) in obj["health_issues"].as_array().unwrap().iter().enumerate() {
        let issue = entry
            .as_object()
            .ok_or_else(|| schema(&format!("health_issues[{index}] is not an object")))?;
        for field in ["issue", "description"] {
            if !issue.get(field).is_some_and(Value::is_string) {
                return Err(schema(&format!(
                    "health_issues[{index}].{field} must be a string"
                )));
            }
        }
        match issue.get("severity").and_then(Value::as_str) {
            Some("mild" | "moderate" | "severe") => {}
            _ => {
                return Err(schema(&format!(
                    "health_issues[{index}].severity must be one of mild, moderate, severe"
                )))
            }
        }
    }

    match obj.get("analysis_summary").and_then(Value::as_str) {
        Some(summary) if !summary.is_empty() => {}
        _ => return Err(schema("analysis_summary must be a non-empty string")),
    }

    for field in [
        "workload_indicators",
        "performance_trends",
        "engagement_patterns",
    ] {
        if !obj.get(field).is_some_and(Value::is_object) {
            return Err(schema(&format!("{field} must be an object")));
        }
    }

    let schedule = obj
        .get("study_schedule")
        .and_then(Value::as_object)
        .ok_or_else(|| schema("study_schedule must be an object"))?;
    for day in WEEKDAYS {
        let blocks = schedule
            .get(day)
            .and_then(Value::as_object)
            .ok_or_else(|| schema(&format!("study_schedule.{day} is missing")))?;
        for block in DAY_BLOCKS {
            if !blocks.get(block).is_some_and(Value::is_string) {
                return Err(schema(&format!(
                    "study_schedule.{day}.{block} must be a string"
                )));
            }
        }
    }

    serde_json::from_value(value).map_err(|e| schema(&e.to_string()))
}

fn schema(detail: &str) -> ReportError {
    ReportError::Schema(detail.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Severity, StressLevel};
    use serde_json::json;

    fn sample_analysis() -> Value {
        let day = json!({ "morning": "Math revision", "afternoon": "Lab write-up", "evening": "Rest" });
        json!({
            "stress_level": "moderate",
            "stress_score": 62,
            "emotional_tone": {
                "confidence": 55,
                "anxiety": 70,
                "motivation": 60,
                "overwhelm": 65,
                "primary_emotion": "anxious"
            },
            "workload_indicators": {
                "course_count": 5,
                "assignment_density": "high",
                "deadline_clustering": true,
                "extracurricular_load": "moderate"
            },
            "performance_trends": {
                "overall_trend": "stable",
                "strengths": ["consistent lab work"],
                "areas_for_improvement": ["exam pacing"]
            },
            "engagement_patterns": {
                "participation_level": "moderate",
                "study_consistency": "irregular",
                "time_management": "fair"
            },
            "stress_causes": ["Overlapping project deadlines", "Heavy exam schedule"],
            "study_schedule": {
                "monday": day, "tuesday": day, "wednesday": day, "thursday": day,
                "friday": day, "saturday": day, "sunday": day
            },
            "stress_tips": ["Block out fixed revision slots", "Take scheduled breaks"],
            "health_issues": [
                { "issue": "Insomnia", "description": "Deadline pressure disrupting sleep", "severity": "moderate" }
            ],
            "analysis_summary": "Moderate stress driven by clustered deadlines."
        })
    }

    #[test]
    fn fenced_and_unwrapped_completions_parse_identically() {
        let body = sample_analysis().to_string();
        let fenced = format!("```json\n{body}\n```");
        assert_eq!(
            parse_completion(&fenced).unwrap(),
            parse_completion(&body).unwrap()
        );
    }

    #[test]
    fn fence_without_language_tag_is_unwrapped() {
        let fenced = format!("```\n{}\n```", sample_analysis());
        assert!(parse_completion(&fenced).is_ok());
    }

    #[test]
    fn non_json_completion_is_a_parse_error() {
        let err = parse_completion("I could not produce an analysis.").unwrap_err();
        assert!(matches!(err, ReportError::Parse(_)));
    }

    #[test]
    fn valid_analysis_is_promoted() {
        let report = validate_report(sample_analysis()).unwrap();
        assert_eq!(report.stress_level, StressLevel::Moderate);
        assert_eq!(report.stress_score, 62.0);
        assert_eq!(report.emotional_tone.anxiety, 70.0);
        assert_eq!(report.health_issues[0].severity, Severity::Moderate);
        assert_eq!(report.stress_causes.len(), 2);
    }

    #[test]
    fn out_of_range_stress_score_is_rejected() {
        let mut value = sample_analysis();
        value["stress_score"] = json!(150);
        assert!(validate_report(value).is_err());
    }

    #[test]
    fn in_range_stress_score_is_accepted() {
        let mut value = sample_analysis();
        value["stress_score"] = json!(42);
        assert!(validate_report(value).is_ok());
    }

    #[test]
    fn unknown_stress_level_is_rejected() {
        let mut value = sample_analysis();
        value["stress_level"] = json!("catastrophic");
        assert!(validate_report(value).is_err());
    }

    #[test]
    fn missing_health_issues_is_rejected() {
        let mut value = sample_analysis();
        value.as_object_mut().unwrap().remove("health_issues");
        let err = validate_report(value).unwrap_err();
        assert!(err.to_string().contains("health_issues"));
    }

    #[test]
    fn empty_collections_are_still_accepted() {
        let mut value = sample_analysis();
        value["stress_causes"] = json!([]);
        value["stress_tips"] = json!([]);
        value["health_issues"] = json!([]);
        assert!(validate_report(value).is_ok());
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let mut value = sample_analysis();
        value["health_issues"][0]["severity"] = json!("fatal");
        assert!(validate_report(value).is_err());
    }

    #[test]
    fn out_of_range_tone_field_names_the_field() {
        let mut value = sample_analysis();
        value["emotional_tone"]["overwhelm"] = json!(-3);
        let err = validate_report(value).unwrap_err();
        assert!(err.to_string().contains("overwhelm"));
    }

    #[test]
    fn incomplete_study_schedule_is_rejected() {
        let mut value = sample_analysis();
        value["study_schedule"].as_object_mut().unwrap().remove("wednesday");
        let err = validate_report(value).unwrap_err();
        assert!(err.to_string().contains("wednesday"));
    }

    #[test]
    fn empty_summary_is_rejected() {
        let mut value = sample_analysis();
        value["analysis_summary"] = json!("");
        assert!(validate_report(value).is_err());
    }
}
