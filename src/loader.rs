use std::path::Path;

use crate::core::traits::source::{SourceLoadError, SourceLoader};

/// Filesystem source loader. Strips a UTF-8 BOM and normalizes CRLF so
/// downstream text analysis sees the same bytes regardless of how the
/// exercise file was authored.
#[derive(Debug, Clone, Default)]
pub struct FsSourceLoader;

impl FsSourceLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SourceLoader for FsSourceLoader {
    async fn load(&self, path: &Path) -> Result<String, SourceLoadError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceLoadError::Io {
                path: path.display().to_string(),
                msg: e.to_string(),
            })?;
        Ok(normalize(raw))
    }
}

fn normalize(raw: String) -> String {
    let without_bom = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
    if without_bom.contains('\r') {
        without_bom.replace("\r\n", "\n")
    } else if without_bom.len() != raw.len() {
        without_bom.to_string()
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn scratch_file(content: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("exercise-harness-tests")
            .join(Uuid::new_v4().to_string());
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("source.tsx");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn strips_bom_and_normalizes_crlf() {
        let path = scratch_file("\u{feff}function App() {\r\n  return null;\r\n}\r\n");
        let loaded = FsSourceLoader::new().load(&path).await.unwrap();
        assert_eq!(loaded, "function App() {\n  return null;\n}\n");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let err = FsSourceLoader::new()
            .load(Path::new("/definitely/not/here.tsx"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceLoadError::Io { .. }));
    }
}
