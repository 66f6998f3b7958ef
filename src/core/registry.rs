use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use tokio::sync::OnceCell;

use crate::core::domain::TestRunner;
use crate::core::traits::catalog::ExerciseCatalog;
use crate::core::traits::resolver::TestModuleResolver;

/// Cache plus loader responsible for producing a test runner for a given
/// exercise identity. Constructor-injected so tests can build isolated
/// instances; entries are added lazily and never removed.
pub struct TestRegistry {
    cache: DashMap<(String, String), TestRunner>,
    resolver: Arc<dyn TestModuleResolver>,
    catalog: Arc<dyn ExerciseCatalog>,
    init: OnceCell<()>,
}

impl std::fmt::Debug for TestRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestRegistry")
            .field("cached", &self.cache.len())
            .field("initialized", &self.init.initialized())
            .finish()
    }
}

impl TestRegistry {
    pub fn new(resolver: Arc<dyn TestModuleResolver>, catalog: Arc<dyn ExerciseCatalog>) -> Self {
        Self {
            cache: DashMap::new(),
            resolver,
            catalog,
            init: OnceCell::new(),
        }
    }

    /// Static registration; overwrites any cached runner for the key.
    pub fn register(&self, category: &str, exercise_id: &str, runner: TestRunner) {
        self.cache
            .insert((category.to_string(), exercise_id.to_string()), runner);
    }

    /// Cache hit fast path, then dynamic resolution. `None` means "no
    /// custom tests defined" and is an expected outcome; resolver faults
    /// are logged and surface the same way. Only successful loads are
    /// cached, so a hit never re-attempts resolution.
    #[tracing::instrument(skip(self))]
    pub async fn get_runner(&self, category: &str, exercise_id: &str) -> Option<TestRunner> {
        let key = (category.to_string(), exercise_id.to_string());
        if let Some(runner) = self.cache.get(&key) {
            return Some(runner.clone());
        }

        match self.resolver.resolve(category, exercise_id).await {
            Ok(Some(runner)) => {
                self.cache.insert(key, runner.clone());
                Some(runner)
            }
            Ok(None) => None,
            Err(error) => {
                tracing::warn!("test module resolution failed: {error}");
                None
            }
        }
    }

    /// Idempotent bulk pre-warm. Concurrent and repeated callers converge
    /// on one underlying initialization effort.
    pub async fn ensure_initialized(&self) {
        self.init.get_or_init(|| self.initialize()).await;
    }

    /// Loads and caches a runner for every exercise of every known
    /// category. Individual failures are logged and skipped; one broken
    /// or missing test module never blocks the others.
    #[tracing::instrument(skip(self))]
    async fn initialize(&self) {
        let categories = match self.catalog.categories().await {
            Ok(categories) => categories,
            Err(error) => {
                tracing::warn!("cannot list categories, registry stays cold: {error}");
                return;
            }
        };

        let mut loads = Vec::new();
        for category in categories {
            let entries = match self.catalog.exercises(&category).await {
                Ok(entries) => entries,
                Err(error) => {
                    tracing::warn!("skipping category {category}: {error}");
                    continue;
                }
            };
            for entry in entries {
                let category = category.clone();
                loads.push(async move {
                    self.warm_one(&category, &entry.id).await;
                });
            }
        }

        // Settle all, fail none.
        join_all(loads).await;
        tracing::info!("registry initialized with {} cached runners", self.cache.len());
    }

    async fn warm_one(&self, category: &str, exercise_id: &str) {
        match self.resolver.resolve(category, exercise_id).await {
            Ok(Some(runner)) => {
                self.cache
                    .insert((category.to_string(), exercise_id.to_string()), runner);
            }
            Ok(None) => {
                tracing::debug!("no test module for {category}/{exercise_id}");
            }
            Err(error) => {
                tracing::warn!("pre-warm failed for {category}/{exercise_id}: {error}");
            }
        }
    }
}
