use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identity of one exercise, as provided by the catalog. Owned by the
/// catalog collaborator, not by the harness.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub category: String,
    pub id: String,
    pub file_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests_path: Option<String>,
}

/// One syntax error or internal compiler fault. `line`/`column` are 1-based
/// and absent for faults that carry no position.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompilationDiagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl CompilationDiagnostic {
    /// A diagnostic with only a message, used when an internal fault
    /// has no position to point at.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
            file: None,
            code: None,
        }
    }
}

/// Result of one compile call. The two variants are mutually exclusive by
/// construction: compiled text and diagnostics never coexist.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum CompilationOutcome {
    #[serde(rename_all = "camelCase")]
    Success { compiled_text: String },
    #[serde(rename_all = "camelCase")]
    Failure {
        diagnostics: Vec<CompilationDiagnostic>,
    },
}

impl CompilationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompilationOutcome::Success { .. })
    }
}

/// Outcome of one named check against compiled text.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TestVerdict {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Advisory only, never used for control flow.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl TestVerdict {
    pub fn passing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            error: None,
            message: None,
            execution_time_ms: None,
        }
    }

    pub fn failing(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            error: Some(error.into()),
            message: None,
            execution_time_ms: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseStatus {
    Completed,
    Failed,
}

impl std::fmt::Display for ExerciseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseStatus::Completed => write!(f, "completed"),
            ExerciseStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Aggregate result for one submission run. Immutable once returned.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    pub exercise: Exercise,
    pub status: ExerciseStatus,
    pub tests: Vec<TestVerdict>,
    pub compilation_errors: Vec<CompilationDiagnostic>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub duration_ms: u64,
}

impl ExerciseResult {
    /// `Completed` iff compilation produced no diagnostics and every
    /// verdict passed.
    pub fn status_of(
        compilation_errors: &[CompilationDiagnostic],
        tests: &[TestVerdict],
    ) -> ExerciseStatus {
        if compilation_errors.is_empty() && tests.iter().all(|t| t.passed) {
            ExerciseStatus::Completed
        } else {
            ExerciseStatus::Failed
        }
    }
}

/// A pure function from compiled text to a list of verdicts; the sole
/// contract a per-exercise test module must satisfy.
pub type TestRunner = Arc<dyn Fn(&str) -> Vec<TestVerdict> + Send + Sync>;

/// One `{ id, ... }` descriptor from a category catalog.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_requires_clean_compile_and_all_passing() {
        let ok = TestVerdict::passing("a");
        let bad = TestVerdict::failing("b", "nope");

        assert_eq!(
            ExerciseResult::status_of(&[], &[ok.clone()]),
            ExerciseStatus::Completed
        );
        assert_eq!(
            ExerciseResult::status_of(&[], &[ok.clone(), bad]),
            ExerciseStatus::Failed
        );
        assert_eq!(
            ExerciseResult::status_of(
                &[CompilationDiagnostic::message_only("boom")],
                &[ok]
            ),
            ExerciseStatus::Failed
        );
        // No verdicts at all is vacuously passing.
        assert_eq!(
            ExerciseResult::status_of(&[], &[]),
            ExerciseStatus::Completed
        );
    }

    #[test]
    fn result_surface_uses_camel_case_field_names() {
        let result = ExerciseResult {
            exercise: Exercise {
                category: "hooks".to_string(),
                id: "use-counter".to_string(),
                file_path: "hooks/use-counter.tsx".to_string(),
                tests_path: None,
            },
            status: ExerciseStatus::Failed,
            tests: vec![TestVerdict::failing("Counter", "missing useState")],
            compilation_errors: vec![],
            started_at: chrono::Utc::now(),
            duration_ms: 3,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("compilationErrors").is_some());
        assert!(json.get("durationMs").is_some());
        assert_eq!(json["status"], "failed");
        assert_eq!(json["exercise"]["filePath"], "hooks/use-counter.tsx");
    }
}
