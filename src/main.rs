use anyhow::{anyhow, Result};
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use arlington_validator_rs::prelude::*;

/// Exit code after Ctrl-C, as a shell reports SIGINT
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "arlington_validator_rs", version)]
#[command(about = "Validate a PDF against Arlington grammar", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract config file for integration
    Config {
        /// Output to save the config JSON file. Application output is used if not provided.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run validation of PDF document
    Validate(ValidateArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// The input PDF file
    #[arg(short, long)]
    input: PathBuf,

    /// The output validation file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Max failures displayed
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    maxfailuresdisplayed: i64,

    /// Format of output
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,
}

fn main() -> ExitCode {
    init_tracing().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return parse_failure(err),
    };

    let Some(command) = cli.command else {
        // Help only; no update check for bare invocations
        if let Err(e) = Cli::command().print_help() {
            tracing::debug!(error = %e, "failed to print help");
        }
        println!();
        return ExitCode::SUCCESS;
    };

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(err) => return report_failure(err.into()),
    };

    // The engine child gets SIGINT from the terminal itself; we only record it
    // so the update task is still joined before exiting.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupt_flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupted. Waiting for running tasks to finish...");
        interrupt_flag.store(true, Ordering::SeqCst);
    }) {
        tracing::debug!(error = %e, "could not install Ctrl-C handler");
    }

    let code = run_with_update_check(settings.update_checker(), || {
        match run_command(command, &settings) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => report_failure(err),
        }
    });

    if interrupted.load(Ordering::SeqCst) {
        return ExitCode::from(EXIT_INTERRUPTED);
    }
    code
}

fn run_command(command: Commands, settings: &Settings) -> Result<()> {
    match command {
        Commands::Config { output } => {
            extract_config(output.as_deref(), &mut io::stdout())?;
        }
        Commands::Validate(args) => {
            let request = ValidationRequest {
                input_path: args.input,
                output_path: args.output,
                max_failures_displayed: args.maxfailuresdisplayed,
                format: args.format,
            };

            let runner = SpinnerRunner::new(
                SystemRunner,
                format!("Validating {}", request.input_path.display()),
            );
            let orchestrator = Orchestrator::new(settings.engine.clone(), runner);

            let result = orchestrator.run(&request, &mut io::stdout(), &mut io::stderr())?;
            tracing::debug!(exit_status = result.exit_status, "validation finished");
        }
    }

    Ok(())
}

fn report_failure(err: anyhow::Error) -> ExitCode {
    eprintln!("{:?}", err);
    eprintln!("Failed to run the program: {}", err);
    ExitCode::FAILURE
}

fn parse_failure(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        _ => {
            let _ = err.print();
            eprintln!("Failed to parse arguments. Please check the usage and try again.");
            ExitCode::from(u8::try_from(err.exit_code()).unwrap_or(2))
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
