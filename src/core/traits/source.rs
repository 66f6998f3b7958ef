use std::path::Path;

#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceLoadError {
    #[error("failed to read {path}: {msg}")]
    Io { path: String, msg: String },
}

/// Loads raw exercise source text from a path, absorbing on-disk encoding
/// quirks (BOM, CRLF) so callers always see plain text.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SourceLoader: std::fmt::Debug + Send + Sync {
    async fn load(&self, path: &Path) -> Result<String, SourceLoadError>;
}
