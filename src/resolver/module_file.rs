//! On-disk test-module format: a JSON or TOML file describing the checks
//! to run against compiled text. This is the declarative counterpart of a
//! per-exercise `runTests` module; the resolver compiles it into a
//! `TestRunner` closure.

use std::sync::Arc;

use serde::Deserialize;

use crate::checks::{ComponentOptions, HookOptions, component_check, hook_check};
use crate::core::domain::{TestRunner, TestVerdict};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TestModuleSpec {
    pub checks: Vec<CheckSpec>,
}

/// One declarative check. `component` and `hook` map onto the check
/// primitives; `contains` is the escape hatch for fully custom substring
/// assertions against the whole compiled text.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CheckSpec {
    #[serde(rename_all = "camelCase")]
    Component {
        unit: String,
        #[serde(default)]
        required_hooks: Vec<String>,
        #[serde(default)]
        required_elements: Vec<String>,
        #[serde(default)]
        error_message: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Hook {
        unit: String,
        #[serde(default)]
        required_hooks: Vec<String>,
        #[serde(default)]
        required_returns: Vec<String>,
        #[serde(default)]
        should_not_return: Vec<String>,
        #[serde(default)]
        error_message: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Contains {
        name: String,
        all_of: Vec<String>,
        #[serde(default)]
        error_message: Option<String>,
    },
}

impl CheckSpec {
    fn run(&self, compiled: &str) -> TestVerdict {
        match self {
            CheckSpec::Component {
                unit,
                required_hooks,
                required_elements,
                error_message,
            } => component_check(
                unit,
                compiled,
                &ComponentOptions {
                    required_hooks: required_hooks.clone(),
                    required_elements: required_elements.clone(),
                    custom_validation: None,
                    error_message: error_message.clone(),
                },
            ),
            CheckSpec::Hook {
                unit,
                required_hooks,
                required_returns,
                should_not_return,
                error_message,
            } => hook_check(
                unit,
                compiled,
                &HookOptions {
                    required_hooks: required_hooks.clone(),
                    required_returns: required_returns.clone(),
                    should_not_return: should_not_return.clone(),
                    custom_validation: None,
                    error_message: error_message.clone(),
                },
            ),
            CheckSpec::Contains {
                name,
                all_of,
                error_message,
            } => {
                let missing: Vec<&String> =
                    all_of.iter().filter(|s| !compiled.contains(s.as_str())).collect();
                if missing.is_empty() {
                    TestVerdict::passing(name.clone())
                } else {
                    let error = error_message.clone().unwrap_or_else(|| {
                        format!(
                            "missing required text: {}",
                            missing
                                .iter()
                                .map(|s| format!("`{s}`"))
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                    });
                    TestVerdict::failing(name.clone(), error)
                }
            }
        }
    }
}

/// Turns a parsed module spec into the pure compiled-text → verdicts
/// function the registry caches.
pub fn compile_runner(spec: TestModuleSpec) -> TestRunner {
    Arc::new(move |compiled: &str| spec.checks.iter().map(|check| check.run(compiled)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_module_round_trips_into_verdicts() {
        let raw = r#"{
            "checks": [
                {
                    "kind": "component",
                    "unit": "Counter",
                    "requiredHooks": ["useState"],
                    "requiredElements": ["button"]
                },
                { "kind": "contains", "name": "wiring", "allOf": ["setCount"] }
            ]
        }"#;
        let spec: TestModuleSpec = serde_json::from_str(raw).unwrap();
        assert_eq!(spec.checks.len(), 2);

        let runner = compile_runner(spec);
        let compiled = concat!(
            "function Counter() {\n",
            "  const [count, setCount] = useState(0);\n",
            "  return <button>{count}</button>;\n",
            "}\n",
        );
        let verdicts = runner(compiled);
        assert_eq!(verdicts.len(), 2);
        assert!(verdicts.iter().all(|v| v.passed), "verdicts: {verdicts:?}");
    }

    #[test]
    fn toml_module_parses_with_the_same_shape() {
        let raw = r#"
            [[checks]]
            kind = "hook"
            unit = "useCounter"
            requiredHooks = ["useState"]
            requiredReturns = ["increment"]
            shouldNotReturn = ["TODO"]
        "#;
        let spec: TestModuleSpec = toml::from_str(raw).unwrap();
        let runner = compile_runner(spec);

        let compiled = concat!(
            "function useCounter() {\n",
            "  const [count, setCount] = useState(0);\n",
            "  const increment = () => setCount(count + 1);\n",
            "  return { count, increment };\n",
            "}\n",
        );
        let verdicts = runner(compiled);
        assert_eq!(verdicts.len(), 1);
        assert!(verdicts[0].passed, "error: {:?}", verdicts[0].error);
    }

    #[test]
    fn contains_check_reports_what_is_missing() {
        let spec = TestModuleSpec {
            checks: vec![CheckSpec::Contains {
                name: "exports".to_string(),
                all_of: vec!["export default".to_string()],
                error_message: None,
            }],
        };
        let runner = compile_runner(spec);
        let verdicts = runner("function App() {}");
        assert!(!verdicts[0].passed);
        assert!(
            verdicts[0]
                .error
                .as_deref()
                .unwrap()
                .contains("export default")
        );
    }
}
