use std::path::PathBuf;

use serde::Deserialize;

use crate::constants::CATALOG_FILE_NAME;
use crate::core::domain::ExerciseEntry;
use crate::core::traits::catalog::{CatalogError, ExerciseCatalog};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    exercises: Vec<ExerciseEntry>,
}

/// Filesystem catalog: every subdirectory of `root` holding an
/// `index.json` is a category; the file lists that category's exercises.
#[derive(Debug, Clone)]
pub struct FsCatalog {
    root: PathBuf,
}

impl FsCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait::async_trait]
impl ExerciseCatalog for FsCatalog {
    async fn categories(&self) -> Result<Vec<String>, CatalogError> {
        let mut entries =
            tokio::fs::read_dir(&self.root)
                .await
                .map_err(|e| CatalogError::Unavailable {
                    category: "<root>".to_string(),
                    msg: e.to_string(),
                })?;

        let mut categories = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.join(CATALOG_FILE_NAME).is_file() {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    categories.push(name.to_string());
                }
            }
        }
        categories.sort();
        Ok(categories)
    }

    #[tracing::instrument(skip(self))]
    async fn exercises(&self, category: &str) -> Result<Vec<ExerciseEntry>, CatalogError> {
        let path = self.root.join(category).join(CATALOG_FILE_NAME);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| CatalogError::Unavailable {
                category: category.to_string(),
                msg: e.to_string(),
            })?;

        let parsed: CatalogFile =
            serde_json::from_str(&raw).map_err(|e| CatalogError::Malformed {
                category: category.to_string(),
                msg: e.to_string(),
            })?;
        Ok(parsed.exercises)
    }
}
