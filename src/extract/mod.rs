//! Code-unit extraction: isolates the textual body of a named function or
//! class inside compiled text.
//!
//! Extraction is an ordered, first-match-wins pipeline of pure strategies.
//! The pattern strategies are fast but can misjudge bodies whose braces do
//! not line up with the pattern's assumptions; the manual brace scan is the
//! slow, always-correct fallback. If the unit name appears more than once,
//! the first textual occurrence wins.

use regex::Regex;

/// A single extraction attempt: `Some(body)` on success, `None` to let the
/// next strategy try.
pub type ExtractionStrategy = fn(&str, &str) -> Option<String>;

/// Returns the body of the named unit, or an empty string when no strategy
/// finds it. Pure function of its inputs; calling it twice with the same
/// arguments returns the same slice.
pub fn extract_unit(text: &str, name: &str) -> String {
    strategies_for(name)
        .iter()
        .find_map(|strategy| strategy(text, name))
        .unwrap_or_default()
}

/// Names that look class-shaped get the class pattern first; everything
/// else starts with the function pattern. The brace scan always runs last.
fn strategies_for(name: &str) -> &'static [ExtractionStrategy] {
    if looks_like_class(name) {
        &[class_pattern, function_pattern, brace_scan]
    } else {
        &[function_pattern, class_pattern, brace_scan]
    }
}

fn looks_like_class(name: &str) -> bool {
    name.contains("Cache") || name.contains("Class")
}

/// Tolerant function-declaration pattern: captures lazily from the opening
/// brace up to a closing brace at column 0. Bodies whose final brace is
/// indented (one-liners, minified output) or whose capture ends up with
/// unbalanced braces are reported as a miss so the brace scan can take over.
fn function_pattern(text: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r"(?m)(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s+{}\s*\([^)]*\)[^{{]*\{{((?s:.)*?)^\}}",
        regex::escape(name)
    );
    capture_balanced(text, &pattern)
}

/// Same shape for `class Name ... { ... }`.
fn class_pattern(text: &str, name: &str) -> Option<String> {
    let pattern = format!(
        r"(?m)(?:export\s+)?(?:default\s+)?class\s+{}\b[^{{]*\{{((?s:.)*?)^\}}",
        regex::escape(name)
    );
    capture_balanced(text, &pattern)
}

fn capture_balanced(text: &str, pattern: &str) -> Option<String> {
    // The pattern is built from an escaped identifier; it cannot fail to
    // compile for any unit name.
    let re = Regex::new(pattern).ok()?;
    let body = re.captures(text)?.get(1)?.as_str();
    if braces_balanced(body) {
        Some(body.to_string())
    } else {
        None
    }
}

fn braces_balanced(body: &str) -> bool {
    let mut depth: i64 = 0;
    for b in body.bytes() {
        match b {
            b'{' => depth += 1,
            b'}' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

/// Manual fallback: find the declaration, then walk from its first `{`
/// counting depth until it returns to zero. Deliberately naive about
/// strings and comments, which is good enough for compiled output.
fn brace_scan(text: &str, name: &str) -> Option<String> {
    let decl_start = declaration_start(text, name)?;
    let open = text[decl_start..].find('{')? + decl_start;

    let mut depth = 0usize;
    for (i, b) in text[open..].bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[open + 1..open + i].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

/// Byte offset of the first declaration of `name`, trying function, class,
/// and `const`-binding forms in order.
fn declaration_start(text: &str, name: &str) -> Option<usize> {
    let escaped = regex::escape(name);
    for prefix in ["function", "class", "const", "let", "var"] {
        let pattern = format!(r"{prefix}\s+{escaped}\b");
        // Infallible for an escaped identifier.
        let re = Regex::new(&pattern).ok()?;
        if let Some(m) = re.find(text) {
            return Some(m.start());
        }
    }
    None
}
