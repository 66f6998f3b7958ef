//! Heuristic test primitives: reusable assertion builders over extracted
//! code units. Per-exercise test modules compose these into verdict lists.
//!
//! The primitives never panic; anything that goes wrong internally (most
//! commonly, extraction coming back empty) is reported as a failed
//! requirement inside the verdict.

use std::sync::Arc;
use std::time::Instant;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

use crate::core::domain::TestVerdict;
use crate::extract::extract_unit;

/// Optional caller-supplied predicate over the extracted body.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

lazy_static! {
    /// JSX as written, plus the shapes the transpiler lowers it into.
    static ref MARKUP_RE: Regex =
        Regex::new(r"<[A-Za-z]|\b(?:_?jsxs?|createElement)\s*\(").unwrap();
    /// Return statements and the expression following them, up to `;` or
    /// end of line.
    static ref RETURN_RE: Regex = Regex::new(r"\breturn\b([^;\n]*)").unwrap();
}

#[derive(Clone, Default)]
pub struct ComponentOptions {
    pub required_hooks: Vec<String>,
    pub required_elements: Vec<String>,
    pub custom_validation: Option<Validator>,
    pub error_message: Option<String>,
}

#[derive(Clone, Default)]
pub struct HookOptions {
    pub required_hooks: Vec<String>,
    pub required_returns: Vec<String>,
    pub should_not_return: Vec<String>,
    pub custom_validation: Option<Validator>,
    pub error_message: Option<String>,
}

/// Checks that the named unit renders markup, is not a null stub, uses the
/// required hooks, mentions the required elements, and satisfies any custom
/// validation. All requirements must hold for a passing verdict.
pub fn component_check(name: &str, compiled: &str, options: &ComponentOptions) -> TestVerdict {
    let started = Instant::now();
    let body = extract_unit(compiled, name);

    let mut failures = Vec::new();
    if body.is_empty() {
        failures.push(format!("unit `{name}` not found in compiled output"));
    } else {
        if !MARKUP_RE.is_match(&body) {
            failures.push("no markup found in component body".to_string());
        }
        if is_null_stub(&body) {
            failures.push("component only returns a null placeholder".to_string());
        }
        for hook in &options.required_hooks {
            if !body.contains(hook.as_str()) {
                failures.push(format!("missing required hook `{hook}`"));
            }
        }
        for element in &options.required_elements {
            if !contains_element(&body, element) {
                failures.push(format!("missing required element `{element}`"));
            }
        }
        if let Some(validate) = &options.custom_validation {
            if !validate(&body) {
                failures.push("custom validation failed".to_string());
            }
        }
    }

    verdict_from(name, failures, options.error_message.as_deref(), started)
}

/// Checks hook usage, required return-expression substrings, and the
/// absence of placeholder returns in the named unit.
pub fn hook_check(name: &str, compiled: &str, options: &HookOptions) -> TestVerdict {
    let started = Instant::now();
    let body = extract_unit(compiled, name);

    let mut failures = Vec::new();
    if body.is_empty() {
        failures.push(format!("unit `{name}` not found in compiled output"));
    } else {
        for hook in &options.required_hooks {
            if !body.contains(hook.as_str()) {
                failures.push(format!("missing required hook `{hook}`"));
            }
        }
        let returns: Vec<String> = return_expressions(&body);
        for required in &options.required_returns {
            if !returns.iter().any(|r| r.contains(required.as_str())) {
                failures.push(format!("missing required return `{required}`"));
            }
        }
        for forbidden in &options.should_not_return {
            if returns.iter().any(|r| r.contains(forbidden.as_str())) {
                failures.push(format!("still returns placeholder `{forbidden}`"));
            }
        }
        if let Some(validate) = &options.custom_validation {
            if !validate(&body) {
                failures.push("custom validation failed".to_string());
            }
        }
    }

    verdict_from(name, failures, options.error_message.as_deref(), started)
}

fn verdict_from(
    name: &str,
    failures: Vec<String>,
    error_message: Option<&str>,
    started: Instant,
) -> TestVerdict {
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if failures.is_empty() {
        TestVerdict {
            name: name.to_string(),
            passed: true,
            error: None,
            message: None,
            execution_time_ms: Some(elapsed_ms),
        }
    } else {
        let error = error_message
            .map(str::to_string)
            .unwrap_or_else(|| failures.iter().join("; "));
        TestVerdict {
            name: name.to_string(),
            passed: false,
            error: Some(error),
            message: None,
            execution_time_ms: Some(elapsed_ms),
        }
    }
}

/// A body is a trivial stub when it has at least one return and every
/// return yields nothing, `null`, or `undefined`.
fn is_null_stub(body: &str) -> bool {
    let mut saw_return = false;
    for caps in RETURN_RE.captures_iter(body) {
        saw_return = true;
        let expr = caps.get(1).map_or("", |m| m.as_str()).trim();
        if !matches!(expr, "" | "null" | "undefined") {
            return false;
        }
    }
    saw_return
}

fn return_expressions(body: &str) -> Vec<String> {
    RETURN_RE
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect()
}

/// Exact match first, lowercase fallback second. Lowered output often
/// downcases intrinsic element names.
fn contains_element(body: &str, element: &str) -> bool {
    body.contains(element) || body.to_lowercase().contains(&element.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = "function Counter() { return <div>{count}</div>; }";

    #[test]
    fn missing_required_hook_fails_with_hook_named_in_error() {
        let verdict = component_check(
            "Counter",
            COUNTER,
            &ComponentOptions {
                required_hooks: vec!["useState".to_string()],
                ..Default::default()
            },
        );
        assert!(!verdict.passed);
        assert!(verdict.error.as_deref().unwrap().contains("useState"));
    }

    #[test]
    fn component_with_markup_and_hooks_passes() {
        let text = concat!(
            "function Counter() {\n",
            "  const [count, setCount] = useState(0);\n",
            "  return <button onClick={() => setCount(count + 1)}>{count}</button>;\n",
            "}\n",
        );
        let verdict = component_check(
            "Counter",
            text,
            &ComponentOptions {
                required_hooks: vec!["useState".to_string()],
                required_elements: vec!["button".to_string()],
                ..Default::default()
            },
        );
        assert!(verdict.passed, "unexpected error: {:?}", verdict.error);
        assert!(verdict.execution_time_ms.is_some());
    }

    #[test]
    fn null_stub_fails_even_with_no_other_requirements() {
        let text = "function Empty() {\n  return null;\n}\n";
        let verdict = component_check("Empty", text, &ComponentOptions::default());
        assert!(!verdict.passed);
        let error = verdict.error.unwrap();
        assert!(error.contains("null placeholder") || error.contains("no markup"));
    }

    #[test]
    fn lowered_jsx_counts_as_markup() {
        let text = "function App() {\n  return _jsx(\"div\", { children: count });\n}\n";
        let verdict = component_check("App", text, &ComponentOptions::default());
        assert!(verdict.passed, "unexpected error: {:?}", verdict.error);
    }

    #[test]
    fn required_elements_fall_back_to_case_insensitive_match() {
        let text = "function Panel() {\n  return <SECTION>ok</SECTION>;\n}\n";
        let verdict = component_check(
            "Panel",
            text,
            &ComponentOptions {
                required_elements: vec!["section".to_string()],
                ..Default::default()
            },
        );
        assert!(verdict.passed, "unexpected error: {:?}", verdict.error);
    }

    #[test]
    fn supplied_error_message_replaces_composed_one() {
        let verdict = component_check(
            "Counter",
            COUNTER,
            &ComponentOptions {
                required_hooks: vec!["useReducer".to_string()],
                error_message: Some("Counter must use a reducer".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(verdict.error.as_deref(), Some("Counter must use a reducer"));
    }

    #[test]
    fn custom_validation_is_a_requirement_like_any_other() {
        let validate: Validator = Arc::new(|body: &str| body.contains("setCount"));
        let verdict = component_check(
            "Counter",
            COUNTER,
            &ComponentOptions {
                custom_validation: Some(validate),
                ..Default::default()
            },
        );
        assert!(!verdict.passed);
        assert!(verdict.error.as_deref().unwrap().contains("custom validation"));
    }

    #[test]
    fn missing_unit_is_a_failed_requirement_not_a_panic() {
        let verdict = component_check("Nope", "function Other() {}", &ComponentOptions::default());
        assert!(!verdict.passed);
        assert!(verdict.error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn hook_check_requires_returns_and_rejects_placeholders() {
        let text = concat!(
            "function useCounter() {\n",
            "  const [count, setCount] = useState(0);\n",
            "  return { count, increment };\n",
            "}\n",
        );
        let good = hook_check(
            "useCounter",
            text,
            &HookOptions {
                required_hooks: vec!["useState".to_string()],
                required_returns: vec!["increment".to_string()],
                should_not_return: vec!["TODO".to_string()],
                ..Default::default()
            },
        );
        assert!(good.passed, "unexpected error: {:?}", good.error);

        let stub = "function useCounter() {\n  return { count: 0, increment: TODO };\n}\n";
        let bad = hook_check(
            "useCounter",
            stub,
            &HookOptions {
                should_not_return: vec!["TODO".to_string()],
                ..Default::default()
            },
        );
        assert!(!bad.passed);
        assert!(bad.error.as_deref().unwrap().contains("TODO"));
    }

    #[test]
    fn multiple_failures_compose_into_one_error() {
        let verdict = component_check(
            "Counter",
            COUNTER,
            &ComponentOptions {
                required_hooks: vec!["useState".to_string(), "useEffect".to_string()],
                required_elements: vec!["table".to_string()],
                ..Default::default()
            },
        );
        let error = verdict.error.unwrap();
        assert!(error.contains("useState"));
        assert!(error.contains("useEffect"));
        assert!(error.contains("table"));
    }
}
