use crate::core::domain::TestRunner;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("failed to load test module for {category}/{exercise_id}: {msg}")]
    LoadFailed {
        category: String,
        exercise_id: String,
        msg: String,
    },
}

/// Locates and loads the test module for one exercise. `Ok(None)` means
/// "no custom tests defined" and is a legitimate, expected outcome, not an
/// error. The lookup strategy (path conventions, extension priority) is an
/// implementation detail behind this seam.
#[mockall::automock]
#[async_trait::async_trait]
pub trait TestModuleResolver: std::fmt::Debug + Send + Sync {
    async fn resolve(
        &self,
        category: &str,
        exercise_id: &str,
    ) -> Result<Option<TestRunner>, ResolveError>;
}
