//! paperlint command line.
//!
//! `paperlint compile <JOB_DIR>` compiles `<JOB_DIR>/input.qp` and writes the
//! job artifacts. `paperlint check <FILE>` compiles one file and prints the
//! issues.
//!
//! Exit codes: 0 when an AST was produced (issues may still be present),
//! 1 on a fatal lexical or syntax error, 2 on an I/O or config failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use paperlint::report::{self, artifacts::INPUT_FILE};
use paperlint::{AnalyzerConfig, CompilationReport, Compiler, PaperlintError};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a job directory and write its artifacts
    Compile {
        /// Directory holding the input paper
        job_dir: PathBuf,

        /// Input file name inside the job directory
        #[arg(long, default_value = INPUT_FILE)]
        input: String,

        /// Where to write artifacts (defaults to the job directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Analyzer config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Compile one paper and print its issues
    Check {
        file: PathBuf,

        /// Analyzer config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "paperlint=debug" } else { "paperlint=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_source(path: &Path) -> Result<String, PaperlintError> {
    std::fs::read_to_string(path).map_err(|source| PaperlintError::ReadInput {
        path: path.to_path_buf(),
        source,
    })
}

fn compile_job(
    job_dir: &Path,
    input: &str,
    out: Option<&Path>,
    config: Option<&Path>,
) -> Result<CompilationReport, PaperlintError> {
    let config = AnalyzerConfig::load(config, Some(job_dir))?;
    let input_path = job_dir.join(input);
    debug!(path = %input_path.display(), "reading paper");
    let source = read_source(&input_path)?;

    let report = Compiler::compile(&source, &config);
    let out_dir = out.unwrap_or(job_dir);
    let artifacts = report::write_job_artifacts(out_dir, &report)?;
    info!(count = artifacts.written.len(), dir = %out_dir.display(), "artifacts written");

    println!(
        "{}: {} error(s), {} warning(s)",
        input_path.display(),
        report.error_count(),
        report.warning_count()
    );
    Ok(report)
}

fn check_file(
    file: &Path,
    config: Option<&Path>,
    json: bool,
) -> Result<CompilationReport, PaperlintError> {
    let config = AnalyzerConfig::load(config, file.parent())?;
    let source = read_source(file)?;
    let report = Compiler::compile(&source, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report);
    }

    for issue in &report.issues {
        println!("{}: {issue}", file.display());
    }
    if let Some(stats) = &report.statistics {
        println!(
            "{} question(s), {} / {} marks, ~{} min, quality score {}",
            stats.question_count,
            stats.total_marks_computed,
            stats.total_marks_declared,
            stats.estimated_total_time,
            stats.quality_score
        );
    }
    Ok(report)
}

fn run(cli: &Cli) -> Result<CompilationReport, PaperlintError> {
    match &cli.command {
        Command::Compile {
            job_dir,
            input,
            out,
            config,
        } => compile_job(job_dir, input, out.as_deref(), config.as_deref()),
        Command::Check { file, config, json } => check_file(file, config.as_deref(), *json),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(report) => match &report.fatal {
            Some(err) => {
                warn!(%err, "compilation failed");
                eprintln!("error: {err}");
                ExitCode::from(1)
            }
            None => ExitCode::SUCCESS,
        },
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}
