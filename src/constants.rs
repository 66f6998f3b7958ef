/// Test-module file extensions, probed in priority order.
pub const TEST_MODULE_EXTENSIONS: &[&str] = &["json", "toml"];

/// Name of the per-category catalog file.
pub const CATALOG_FILE_NAME: &str = "index.json";

/// Name of the fallback verdict emitted when no test module exists.
pub const FALLBACK_CHECK_NAME: &str = "compiles";
