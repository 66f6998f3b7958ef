pub mod module_file;

use std::path::{Path, PathBuf};

use crate::constants::TEST_MODULE_EXTENSIONS;
use crate::core::domain::TestRunner;
use crate::core::traits::resolver::{ResolveError, TestModuleResolver};
use crate::resolver::module_file::{TestModuleSpec, compile_runner};

/// Convention-based filesystem resolver: probes
/// `<root>/<category>/<exercise_id>.<ext>` for each extension in priority
/// order and loads the first candidate that exists and parses. Unreadable
/// or malformed candidates are logged and skipped; running out of
/// candidates is a plain miss, not an error.
#[derive(Debug, Clone)]
pub struct FsTestResolver {
    root: PathBuf,
}

impl FsTestResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn candidates(&self, category: &str, exercise_id: &str) -> Vec<PathBuf> {
        TEST_MODULE_EXTENSIONS
            .iter()
            .map(|ext| {
                self.root
                    .join(category)
                    .join(format!("{exercise_id}.{ext}"))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl TestModuleResolver for FsTestResolver {
    #[tracing::instrument(skip(self))]
    async fn resolve(
        &self,
        category: &str,
        exercise_id: &str,
    ) -> Result<Option<TestRunner>, ResolveError> {
        for candidate in self.candidates(category, exercise_id) {
            let raw = match tokio::fs::read_to_string(&candidate).await {
                Ok(raw) => raw,
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => continue,
                Err(error) => {
                    tracing::warn!("cannot read {}: {error}", candidate.display());
                    continue;
                }
            };

            match parse_module(&candidate, &raw) {
                Ok(spec) => {
                    tracing::debug!("loaded test module {}", candidate.display());
                    return Ok(Some(compile_runner(spec)));
                }
                Err(msg) => {
                    tracing::warn!("malformed test module {}: {msg}", candidate.display());
                    continue;
                }
            }
        }
        Ok(None)
    }
}

fn parse_module(path: &Path, raw: &str) -> Result<TestModuleSpec, String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(raw).map_err(|e| e.to_string()),
        _ => serde_json::from_str(raw).map_err(|e| e.to_string()),
    }
}
