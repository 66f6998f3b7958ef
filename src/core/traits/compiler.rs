use crate::core::domain::CompilationOutcome;

/// Turns learner source text into executable-shaped compiled text, or a
/// list of syntax diagnostics. `file_name` is notional and only affects
/// diagnostics. Implementations never fail outright: internal faults are
/// downgraded into the diagnostics variant.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SourceCompiler: std::fmt::Debug + Send + Sync {
    async fn compile(&self, source: &str, file_name: &str) -> CompilationOutcome;
}
