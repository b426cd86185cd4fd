mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tf_av::{MergeOutcome, ToolRegistry};
use trackforge::{config, inputs, Collaborators, PipelineExecutor};

/// Exit code for unusable arguments, configuration or environment.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "trackforge=trace,tf_av=trace,tf_naming=trace,tf_core=debug".to_string()
        } else {
            "trackforge=info,tf_av=info,tf_naming=info,tf_core=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let files = match inputs::expand_inputs(&cli.input) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(EXIT_USAGE));
        }
    };

    let executor = match prepare(&cli) {
        Ok(executor) => executor,
        Err(e) => {
            eprintln!("Usage error: {e:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    run_all(&executor, &files)
}

/// Load config and locate the external tools.
fn prepare(cli: &Cli) -> Result<PipelineExecutor> {
    let config = config::load_config_or_default(cli.config.as_deref())?;

    let registry = ToolRegistry::discover(&config.tools);
    registry
        .require_all()
        .context("Required external tools are missing")?;
    for info in registry.check_all() {
        tracing::debug!(
            path = ?info.path,
            "{}: {}",
            info.name,
            info.version.as_deref().unwrap_or("unknown version")
        );
    }
    let tools = Collaborators::system(&registry)?;

    Ok(PipelineExecutor::new(tools, config))
}

/// Process every input in turn; one failure does not stop the rest.
fn run_all(executor: &PipelineExecutor, files: &[std::path::PathBuf]) -> ExitCode {
    let mut failed = 0usize;

    for file in files {
        match executor.process(file) {
            Ok(report) => {
                let note = match report.outcome {
                    MergeOutcome::Clean => "",
                    MergeOutcome::Warnings(_) => " (with warnings)",
                };
                tracing::info!(
                    selected = report.selected,
                    dropped = report.dropped,
                    "wrote {}{note}",
                    report.output.display()
                );
            }
            Err(e) if e.is_fatal() => {
                eprintln!("{e}");
                return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(EXIT_USAGE));
            }
            Err(e) => {
                failed += 1;
                tracing::error!("failed to process {}: {e}", file.display());
            }
        }
    }

    if failed > 0 {
        tracing::error!("{failed} of {} inputs failed", files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
