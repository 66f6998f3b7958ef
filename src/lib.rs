//! Evaluation harness for learner exercise submissions.
//!
//! Pipeline for one submission: source text goes through the compiler
//! (syntax check + sugar-stripping transpile), the registry produces the
//! exercise's test runner (or `None`), the runner inspects named code
//! units with the check primitives, and the orchestrator packages the
//! verdicts into one [`core::domain::ExerciseResult`].

pub mod catalog;
pub mod checks;
pub mod compiler;
pub mod constants;
pub mod core;
pub mod extract;
pub mod loader;
pub mod resolver;
mod util;


pub use crate::core::domain::{
    CompilationDiagnostic, CompilationOutcome, Exercise, ExerciseEntry, ExerciseResult,
    ExerciseStatus, TestRunner, TestVerdict,
};
pub use crate::core::orchestrator::ExerciseRunner;
pub use crate::core::registry::TestRegistry;
