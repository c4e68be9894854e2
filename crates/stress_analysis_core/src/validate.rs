//! crates/stress_analysis_core/src/validate.rs
//!
//! Input validation and normalization for incoming analysis requests.
//! Every rejection here happens before any network call is made.

use crate::domain::AnalysisRequest;

/// Upper bound on the document text accepted from a caller, in characters.
pub const MAX_DOCUMENT_CHARS: usize = 500_000;

/// Upper bound on a sanitized file name, in characters.
pub const MAX_FILE_NAME_CHARS: usize = 255;

/// Upper bound on a student name, in characters.
pub const MAX_STUDENT_NAME_CHARS: usize = 100;

/// A rejection produced by input validation. Maps to HTTP 400.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("File content is required")]
    MissingFileContent,
    #[error("File content exceeds the {MAX_DOCUMENT_CHARS} character limit")]
    FileContentTooLarge,
    #[error("File name is required")]
    MissingFileName,
    #[error("Student name exceeds the {MAX_STUDENT_NAME_CHARS} character limit")]
    StudentNameTooLong,
    #[error("Student name must be a string")]
    StudentNameNotAString,
}

/// Checks and normalizes the three request fields.
///
/// For `file_content` and `file_name`, callers pass `None` for a field that
/// is missing, null, or not a string; all three are rejected identically.
/// A `student_name` of the wrong type must be rejected with
/// [`ValidationError::StudentNameNotAString`] before this function; `None`
/// here means the field was genuinely absent or null.
pub fn validate_request(
    file_content: Option<String>,
    file_name: Option<String>,
    student_name: Option<String>,
) -> Result<AnalysisRequest, ValidationError> {
    let document_text = match file_content {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ValidationError::MissingFileContent),
    };
    if document_text.chars().count() > MAX_DOCUMENT_CHARS {
        return Err(ValidationError::FileContentTooLarge);
    }

    let file_name = match file_name {
        Some(name) => sanitize_file_name(&name),
        None => return Err(ValidationError::MissingFileName),
    };

    let student_name = match student_name {
        Some(name) => {
            if name.chars().count() > MAX_STUDENT_NAME_CHARS {
                return Err(ValidationError::StudentNameTooLong);
            }
            sanitize_student_name(&name)
        }
        None => None,
    };

    Ok(AnalysisRequest {
        document_text,
        file_name,
        student_name,
    })
}

/// Replaces every character outside `[A-Za-z0-9._- ]` with `_` and truncates
/// to [`MAX_FILE_NAME_CHARS`]. An empty input stays empty rather than being
/// rejected; only a missing field is an error.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .take(MAX_FILE_NAME_CHARS)
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Strips every character outside `[A-Za-z0-9 .'-]` and truncates to
/// [`MAX_STUDENT_NAME_CHARS`]. A name that sanitizes to nothing is treated
/// as absent, not as an error.
pub fn sanitize_student_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '\'' | '-'))
        .take(MAX_STUDENT_NAME_CHARS)
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_with_forbidden_chars_is_masked() {
        assert_eq!(sanitize_file_name("my:report*.pdf"), "my_report_.pdf");
    }

    #[test]
    fn file_name_is_truncated_to_limit() {
        let long = "a".repeat(300);
        assert_eq!(sanitize_file_name(&long).len(), MAX_FILE_NAME_CHARS);
    }

    #[test]
    fn empty_file_name_is_kept_not_rejected() {
        let req = validate_request(
            Some("some document".into()),
            Some("".into()),
            None,
        )
        .unwrap();
        assert_eq!(req.file_name, "");
    }

    #[test]
    fn missing_file_content_is_rejected() {
        let err = validate_request(None, Some("a.txt".into()), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingFileContent);
        assert_eq!(err.to_string(), "File content is required");
    }

    #[test]
    fn empty_file_content_is_rejected() {
        let err = validate_request(Some(String::new()), Some("a.txt".into()), None).unwrap_err();
        assert_eq!(err, ValidationError::MissingFileContent);
    }

    #[test]
    fn oversized_document_is_rejected() {
        let big = "x".repeat(MAX_DOCUMENT_CHARS + 1);
        let err = validate_request(Some(big), Some("a.txt".into()), None).unwrap_err();
        assert_eq!(err, ValidationError::FileContentTooLarge);
    }

    #[test]
    fn document_at_the_limit_is_accepted() {
        let exact = "x".repeat(MAX_DOCUMENT_CHARS);
        assert!(validate_request(Some(exact), Some("a.txt".into()), None).is_ok());
    }

    #[test]
    fn student_name_is_cleaned() {
        assert_eq!(
            sanitize_student_name("Ana-Maria O'Neil <script>"),
            Some("Ana-Maria O'Neil script".into())
        );
    }

    #[test]
    fn student_name_of_only_forbidden_chars_becomes_absent() {
        let req = validate_request(
            Some("doc".into()),
            Some("a.txt".into()),
            Some("<<<>>>".into()),
        )
        .unwrap();
        assert_eq!(req.student_name, None);
    }

    #[test]
    fn overlong_student_name_is_rejected() {
        let err = validate_request(
            Some("doc".into()),
            Some("a.txt".into()),
            Some("n".repeat(MAX_STUDENT_NAME_CHARS + 1)),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::StudentNameTooLong);
    }
}
