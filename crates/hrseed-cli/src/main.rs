mod atomic;
mod logging;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use hrseed_core::{build_fk_graph_report, hr_schema, validate_schema};
use hrseed_generate::{GenerateOptions, GenerationEngine, GenerationError};
use hrseed_plan::{
    OutputFormat, PlanError, ValidatedPlan, ValidationIssue, default_plan, load_plan,
    plan_json_schema,
};
use thiserror::Error;

use atomic::{write_artifact, write_json_atomic};
use logging::init_logging;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("catalog error: {0}")]
    Catalog(#[from] hrseed_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "hrseed",
    version,
    about = "Deterministic HR fixture generator",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a fixture (the default command).
    Generate(GenerateArgs),
    /// Validate a seed plan and print its issues.
    Validate(ValidateArgs),
    /// Print the seed plan JSON Schema.
    PlanSchema,
    /// Print the HR catalog and its insert order.
    Catalog,
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// Output path; a directory for CSV output.
    #[arg(long)]
    out: Option<PathBuf>,
    /// RNG seed; defaults to the plan seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Seed plan file (TOML or JSON); defaults to the embedded plan.
    #[arg(long)]
    plan: Option<PathBuf>,
    /// Output format; defaults to the plan's.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
    /// Also write the generation report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Seed plan file; defaults to the embedded plan.
    #[arg(long)]
    plan: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum FormatArg {
    Sql,
    Json,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Sql => OutputFormat::Sql,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Csv => OutputFormat::Csv,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "hrseed failed");
        eprintln!("error: {err}");
        if let CliError::Plan(PlanError::Invalid(report)) = &err {
            for issue in &report.errors {
                eprintln!("  {issue}");
            }
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging()?;
    match cli.command {
        Some(Command::Generate(args)) => run_generate(args),
        Some(Command::Validate(args)) => run_validate(args),
        Some(Command::PlanSchema) => {
            println!("{}", serde_json::to_string_pretty(&plan_json_schema())?);
            Ok(())
        }
        Some(Command::Catalog) => run_catalog(),
        None => run_generate(cli.generate),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let validated = resolve_plan(args.plan.as_deref())?;
    log_warnings(&validated.warnings);

    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or(validated.plan.output.format);
    let out = args.out.unwrap_or_else(|| default_out(format));

    let engine = GenerationEngine::new(GenerateOptions {
        seed: args.seed,
        format: Some(format),
        ..GenerateOptions::default()
    });
    let result = engine.run(&validated.plan)?;

    write_artifact(&out, &result.artifact)?;
    tracing::info!(
        path = %out.display(),
        bytes = result.report.bytes_written,
        sha256 = %result.report.sha256,
        "artifact written"
    );

    if let Some(report_path) = args.report {
        write_json_atomic(&report_path, &result.report)?;
        tracing::info!(path = %report_path.display(), "report written");
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let validated = resolve_plan(args.plan.as_deref())?;
    for issue in &validated.warnings {
        println!("{issue}");
    }
    println!(
        "plan ok: {} departments, {} employees, {} warning(s)",
        validated.plan.departments.len(),
        validated.plan.total_employees(),
        validated.warnings.len()
    );
    Ok(())
}

fn run_catalog() -> Result<(), CliError> {
    let catalog = hr_schema();
    validate_schema(&catalog)?;
    let report = build_fk_graph_report(&catalog);
    let document = serde_json::json!({
        "catalog": catalog,
        "fk_graph": report,
    });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn resolve_plan(path: Option<&Path>) -> Result<ValidatedPlan, CliError> {
    let validated = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading plan");
            load_plan(path)?
        }
        None => default_plan()?,
    };
    Ok(validated)
}

fn log_warnings(warnings: &[ValidationIssue]) {
    for issue in warnings {
        tracing::warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
    }
}

fn default_out(format: OutputFormat) -> PathBuf {
    PathBuf::from(match format {
        OutputFormat::Sql => "seed.sql",
        OutputFormat::Json => "seed.json",
        OutputFormat::Csv => "seed",
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_flags_mean_generate() {
        let cli = Cli::try_parse_from(["hrseed", "--out", "x.sql", "--seed", "42"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.generate.out, Some(PathBuf::from("x.sql")));
        assert_eq!(cli.generate.seed, Some(42));
        assert_eq!(cli.generate.format, None);
    }

    #[test]
    fn subcommands_parse() {
        let cli = Cli::try_parse_from(["hrseed", "generate", "--format", "csv"]).expect("parse");
        match cli.command {
            Some(Command::Generate(args)) => assert_eq!(args.format, Some(FormatArg::Csv)),
            other => panic!("unexpected command {other:?}"),
        }
        let cli = Cli::try_parse_from(["hrseed", "plan-schema"]).expect("parse");
        assert!(matches!(cli.command, Some(Command::PlanSchema)));
        assert!(Cli::try_parse_from(["hrseed", "--seed", "nope"]).is_err());
    }

    #[test]
    fn default_out_follows_format() {
        assert_eq!(default_out(OutputFormat::Sql), PathBuf::from("seed.sql"));
        assert_eq!(default_out(OutputFormat::Csv), PathBuf::from("seed"));
    }
}
