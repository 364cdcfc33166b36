use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calc_cli::catalogue::field_catalogue;
use calc_cli::config::AppConfig;
use calc_cli::export::{self, ExportFormat};
use calc_cli::input_loader;
use calc_cli::logging::init_logging;
use calc_core::{CalculatorRegistry, CalculatorSession};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

const DEFAULT_CONFIG: &str = "calc.toml";

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal-finance and household calculators.
///
/// Each calculator is mounted with its default inputs; `run` applies any
/// input file and `--set` overrides, calculates once and prints or exports
/// the report.
#[derive(Debug, Parser)]
#[command(name = "calc", version, about, long_about = None)]
struct Cli {
    /// TOML config file. `calc.toml` in the working directory is used when
    /// present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or EnvFilter directive; overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available calculators.
    List,

    /// Show a calculator's fields with ranges and defaults.
    Fields {
        /// Calculator slug, e.g. `loan`.
        slug: String,
    },

    /// Calculate and print or export a report.
    Run(RunArgs),
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Calculator slug, e.g. `loan`.
    slug: String,

    /// Set a field from raw text, e.g. `--set loan_amount=250,000`.
    /// Applied after `--input`, in order.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, String)>,

    /// Input snapshot CSV with `entry,field,value` rows.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Write the final input as a snapshot CSV before calculating.
    #[arg(long, value_name = "PATH")]
    save_input: Option<PathBuf>,

    /// Report format; defaults to the config file's `export.format`.
    #[arg(long, value_enum)]
    format: Option<ExportFormat>,

    /// Write the report here instead of stdout. With `--format csv` each
    /// report table is written next to it as well.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (field, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{arg}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{arg}'"));
    }
    Ok((field.to_string(), value.to_string()))
}

// ─── commands ────────────────────────────────────────────────────────────────

fn list(registry: &CalculatorRegistry) {
    for slug in registry.available() {
        let title = registry.title_of(slug).unwrap_or_default();
        println!("{slug:<18} {title}");
    }
}

fn fields(
    registry: &CalculatorRegistry,
    slug: &str,
) -> Result<()> {
    let session = registry.mount(slug)?;
    print!("{}", field_catalogue(session.as_ref()));
    Ok(())
}

fn apply_input(
    session: &mut dyn CalculatorSession,
    args: &RunArgs,
) -> Result<()> {
    if let Some(path) = &args.input {
        let records = input_loader::load_from_file(path)
            .with_context(|| format!("Failed to load input: {}", path.display()))?;
        let applied = input_loader::apply(session, &records)
            .with_context(|| format!("Failed to apply input: {}", path.display()))?;
        info!(applied, path = %path.display(), "applied input file");
    }

    for (field, value) in &args.assignments {
        session
            .update_raw(field, value)
            .with_context(|| format!("Failed to set '{field}'"))?;
        debug!(%field, %value, "applied --set");
    }
    Ok(())
}

fn output_path(
    args: &RunArgs,
    config: &AppConfig,
    slug: &str,
    format: ExportFormat,
) -> Option<PathBuf> {
    args.output.clone().or_else(|| {
        config
            .export
            .directory
            .as_ref()
            .map(|dir| dir.join(export::default_file_name(slug, format)))
    })
}

fn run(
    registry: &CalculatorRegistry,
    config: &AppConfig,
    args: &RunArgs,
) -> Result<()> {
    let mut session = registry.mount(&args.slug)?;
    apply_input(session.as_mut(), args)?;

    if let Some(path) = &args.save_input {
        let snapshot = input_loader::to_snapshot_csv(session.as_ref())?;
        fs::write(path, snapshot)
            .with_context(|| format!("Failed to write input snapshot: {}", path.display()))?;
        info!(path = %path.display(), "saved input snapshot");
    }

    let report = session.calculate();
    let format = args.format.unwrap_or(config.export.format);

    match output_path(args, config, session.slug(), format) {
        Some(path) => {
            export::write_report(&report, format, &path)?;
            if format == ExportFormat::Csv {
                export::write_table_files(&report, &path)?;
            }
        }
        None => print!("{}", export::render(&report, format)?),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG))
            .with_context(|| format!("Failed to load config: {DEFAULT_CONFIG}")),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(level, config.logging.file.as_deref())?;

    let registry = CalculatorRegistry::with_builtin_calculators();
    debug!(calculators = registry.available().len(), "registry ready");

    match &cli.command {
        Command::List => list(&registry),
        Command::Fields { slug } => fields(&registry, slug)?,
        Command::Run(args) => run(&registry, &config, args)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("loan_amount=250,000"),
            Ok(("loan_amount".to_string(), "250,000".to_string()))
        );
        assert_eq!(
            parse_assignment("name=a=b"),
            Ok(("name".to_string(), "a=b".to_string()))
        );
    }

    #[test]
    fn parse_assignment_rejects_missing_parts() {
        assert!(parse_assignment("loan_amount").is_err());
        assert!(parse_assignment("=5").is_err());
    }

    #[test]
    fn run_args_collect_repeated_set() {
        let cli = Cli::try_parse_from([
            "calc",
            "run",
            "loan",
            "--set",
            "loan_amount=100000",
            "--set",
            "annual_rate=6",
            "--format",
            "csv",
        ])
        .unwrap();

        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.assignments.len(), 2);
        assert_eq!(args.format, Some(ExportFormat::Csv));
    }

    #[test]
    fn output_path_falls_back_to_config_directory() {
        let cli = Cli::try_parse_from(["calc", "run", "loan"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        let mut config = AppConfig::default();

        assert_eq!(output_path(&args, &config, "loan", ExportFormat::Csv), None);

        config.export.directory = Some(PathBuf::from("reports"));
        assert_eq!(
            output_path(&args, &config, "loan", ExportFormat::Csv),
            Some(PathBuf::from("reports").join("loan.csv"))
        );
    }
}
