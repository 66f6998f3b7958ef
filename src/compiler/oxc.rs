use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use itertools::Itertools;
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_diagnostics::OxcDiagnostic;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;
use oxc_transformer::{TransformOptions, Transformer};

use crate::core::domain::{CompilationDiagnostic, CompilationOutcome};
use crate::core::traits::compiler::SourceCompiler;
use crate::util::panic_message;

/// Production compiler: syntax-only parse of TSX source via oxc, then a
/// type-stripping/JSX-lowering transform into executable-shaped text.
/// Pure function of (source, file name); never lets a fault escape.
#[derive(Debug, Default)]
pub struct OxcCompiler;

impl OxcCompiler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SourceCompiler for OxcCompiler {
    #[tracing::instrument(skip(self, source))]
    async fn compile(&self, source: &str, file_name: &str) -> CompilationOutcome {
        let outcome = catch_unwind(AssertUnwindSafe(|| compile_inner(source, file_name)));
        match outcome {
            Ok(outcome) => outcome,
            Err(panic) => {
                let msg = panic_message(panic.as_ref());
                tracing::error!("compiler panicked: {msg}");
                CompilationOutcome::Failure {
                    diagnostics: vec![CompilationDiagnostic::message_only(format!(
                        "internal compiler fault: {msg}"
                    ))],
                }
            }
        }
    }
}

fn compile_inner(source: &str, file_name: &str) -> CompilationOutcome {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_module(true)
        .with_typescript(true)
        .with_jsx(true);

    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        // Short-circuit before transpilation: syntax errors only.
        let diagnostics = ret
            .errors
            .iter()
            .map(|error| diagnostic_from(error, source, file_name))
            .collect();
        return CompilationOutcome::Failure { diagnostics };
    }

    let mut program = ret.program;
    let scoping = SemanticBuilder::new()
        .build(&program)
        .semantic
        .into_scoping();

    let options = TransformOptions::default();
    let transformed =
        Transformer::new(&allocator, Path::new(file_name), &options)
            .build_with_scoping(scoping, &mut program);
    if !transformed.errors.is_empty() {
        let msg = transformed.errors.iter().map(ToString::to_string).join("; ");
        return CompilationOutcome::Failure {
            diagnostics: vec![CompilationDiagnostic::message_only(format!(
                "transform failed: {msg}"
            ))],
        };
    }

    CompilationOutcome::Success {
        compiled_text: Codegen::new().build(&program).code,
    }
}

fn diagnostic_from(error: &OxcDiagnostic, source: &str, file_name: &str) -> CompilationDiagnostic {
    let offset = error
        .labels
        .as_ref()
        .and_then(|labels| labels.first())
        .map(|label| label.offset());
    let (line, column) = match offset {
        Some(offset) => {
            let (line, column) = line_col_at(source, offset);
            (Some(line), Some(column))
        }
        None => (None, None),
    };

    CompilationDiagnostic {
        message: error.message.to_string(),
        line,
        column,
        file: Some(file_name.to_string()),
        code: error_code(error),
    }
}

/// 1-based line/column from a byte offset into the source.
fn line_col_at(source: &str, offset: usize) -> (u32, u32) {
    let clamped = offset.min(source.len());
    let before = &source.as_bytes()[..clamped];
    let line = before.iter().filter(|&&b| b == b'\n').count() as u32 + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let column = source[line_start..clamped].chars().count() as u32 + 1;
    (line, column)
}

fn error_code(error: &OxcDiagnostic) -> Option<String> {
    let scope = error.code.scope.as_deref();
    let number = error.code.number.as_deref();
    match (scope, number) {
        (None, None) => None,
        (Some(scope), None) => Some(scope.to_string()),
        (None, Some(number)) => Some(number.to_string()),
        (Some(scope), Some(number)) => Some(format!("{scope}({number})")),
    }
}
