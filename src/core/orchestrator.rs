use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::constants::FALLBACK_CHECK_NAME;
use crate::core::domain::{
    CompilationDiagnostic, CompilationOutcome, Exercise, ExerciseResult, TestVerdict,
};
use crate::core::registry::TestRegistry;
use crate::core::traits::compiler::SourceCompiler;
use crate::util::panic_message;

/// Top-level entry point for one submission: compile, look up the
/// exercise's test runner, collect verdicts, package a result. The public
/// contract is "never fails": every fault inside the pipeline resolves
/// into a `failed` result.
pub struct ExerciseRunner {
    compiler: Arc<dyn SourceCompiler>,
    registry: Arc<TestRegistry>,
}

impl std::fmt::Debug for ExerciseRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseRunner")
            .field("registry", &self.registry)
            .finish()
    }
}

impl ExerciseRunner {
    pub fn new(compiler: Arc<dyn SourceCompiler>, registry: Arc<TestRegistry>) -> Self {
        Self { compiler, registry }
    }

    #[tracing::instrument(skip(self, source), fields(category = %exercise.category, id = %exercise.id))]
    pub async fn run_exercise(&self, exercise: &Exercise, source: &str) -> ExerciseResult {
        let run_id = Uuid::new_v4();
        let started_at = chrono::Utc::now();
        let started = Instant::now();
        tracing::debug!(%run_id, "running exercise");

        let compiled_text = match self.compiler.compile(source, &exercise.file_path).await {
            CompilationOutcome::Success { compiled_text } => compiled_text,
            CompilationOutcome::Failure { diagnostics } => {
                // Unparseable code never reaches the tests.
                tracing::debug!(%run_id, "compilation failed with {} diagnostics", diagnostics.len());
                return finish(exercise, vec![], diagnostics, started_at, started);
            }
        };

        self.registry.ensure_initialized().await;
        let runner = self
            .registry
            .get_runner(&exercise.category, &exercise.id)
            .await;

        let (tests, diagnostics) = match runner {
            Some(runner) => {
                match catch_unwind(AssertUnwindSafe(|| runner(&compiled_text))) {
                    Ok(verdicts) => (verdicts, vec![]),
                    Err(panic) => {
                        let msg = panic_message(panic.as_ref());
                        tracing::error!(%run_id, "test runner panicked: {msg}");
                        (
                            vec![],
                            vec![CompilationDiagnostic::message_only(format!(
                                "test runner failed: {msg}"
                            ))],
                        )
                    }
                }
            }
            // No custom tests is not a failure condition.
            None => (vec![fallback_verdict()], vec![]),
        };

        finish(exercise, tests, diagnostics, started_at, started)
    }
}

fn fallback_verdict() -> TestVerdict {
    let mut verdict = TestVerdict::passing(FALLBACK_CHECK_NAME);
    verdict.message = Some("compiled successfully; no custom checks registered".to_string());
    verdict
}

fn finish(
    exercise: &Exercise,
    tests: Vec<TestVerdict>,
    compilation_errors: Vec<CompilationDiagnostic>,
    started_at: chrono::DateTime<chrono::Utc>,
    started: Instant,
) -> ExerciseResult {
    let status = ExerciseResult::status_of(&compilation_errors, &tests);
    ExerciseResult {
        exercise: exercise.clone(),
        status,
        tests,
        compilation_errors,
        started_at,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}
