use crate::core::domain::ExerciseEntry;

#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("no catalog for category {category}: {msg}")]
    Unavailable { category: String, msg: String },
    #[error("malformed catalog for category {category}: {msg}")]
    Malformed { category: String, msg: String },
}

/// Source of exercise metadata, iterated during bulk registry
/// initialization. A category that simply lacks a catalog surfaces as
/// `Unavailable` and is skipped by the caller.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ExerciseCatalog: std::fmt::Debug + Send + Sync {
    async fn categories(&self) -> Result<Vec<String>, CatalogError>;

    async fn exercises(&self, category: &str) -> Result<Vec<ExerciseEntry>, CatalogError>;
}
