use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use exercise_harness::catalog::FsCatalog;
use exercise_harness::compiler::oxc::OxcCompiler;
use exercise_harness::core::traits::source::SourceLoader;
use exercise_harness::loader::FsSourceLoader;
use exercise_harness::resolver::FsTestResolver;
use exercise_harness::{Exercise, ExerciseRunner, ExerciseStatus, TestRegistry};

/// Run one exercise submission through the evaluation harness.
#[derive(Debug, Parser)]
#[command(name = "exercise-harness", version)]
struct Args {
    /// Exercise category (e.g. "state").
    #[arg(long)]
    category: String,

    /// Exercise id within the category.
    #[arg(long)]
    id: String,

    /// Path to the learner's source file.
    #[arg(long)]
    file: PathBuf,

    /// Root directory of per-exercise test modules.
    #[arg(long, default_value = "tests-modules")]
    tests_dir: PathBuf,

    /// Root directory of category catalogs.
    #[arg(long, default_value = "catalog")]
    catalog_dir: PathBuf,

    /// Print the full result as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    set_panic_hook();

    let args = Args::parse();

    let registry = Arc::new(TestRegistry::new(
        Arc::new(FsTestResolver::new(&args.tests_dir)),
        Arc::new(FsCatalog::new(&args.catalog_dir)),
    ));
    let runner = ExerciseRunner::new(Arc::new(OxcCompiler::new()), registry);

    let exercise = Exercise {
        category: args.category,
        id: args.id,
        file_path: args.file.display().to_string(),
        tests_path: None,
    };

    let source = FsSourceLoader::new().load(Path::new(&args.file)).await?;
    let result = runner.run_exercise(&exercise, &source).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{}/{}: {} ({} ms)",
            result.exercise.category, result.exercise.id, result.status, result.duration_ms
        );
        for diagnostic in &result.compilation_errors {
            match (diagnostic.line, diagnostic.column) {
                (Some(line), Some(column)) => {
                    println!("  error[{line}:{column}] {}", diagnostic.message)
                }
                _ => println!("  error: {}", diagnostic.message),
            }
        }
        for verdict in &result.tests {
            let mark = if verdict.passed { "ok" } else { "FAIL" };
            match &verdict.error {
                Some(error) => println!("  {mark} {} - {error}", verdict.name),
                None => println!("  {mark} {}", verdict.name),
            }
        }
    }

    if result.status == ExerciseStatus::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
