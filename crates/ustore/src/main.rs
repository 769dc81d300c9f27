use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;
use ustore_config::{get_config_path, Config};
use ustore_output::format_profiling;

mod cli;
mod perform;
mod profiling;

use cli::Cli;
use perform::{perform, write_error, EXIT_CONFIG};

fn main() -> ExitCode {
    let cli = Cli::parse_normalized();

    if cli.print_config {
        return match handle_print_config() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{:#}", e);
                ExitCode::from(EXIT_CONFIG)
            }
        };
    }

    let config_path = get_config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config {}: {}", config_path.display(), e);
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    if let Err(e) = init_logging(&config.log.level, cli.verbose) {
        eprintln!("Warning: {:#}", e);
    }

    let arguments = cli.arguments();
    let mut stdout = std::io::stdout().lock();

    let result = if cli.profile {
        let (result, functions) =
            profiling::profiled(|| perform(arguments, &config.store, &mut stdout));
        let table = format_profiling(&functions);
        if !table.is_empty() {
            eprintln!("\n{}", table);
        }
        result
    } else {
        perform(arguments, &config.store, &mut stdout)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let Err(write_err) = write_error(&mut stdout, &e) {
                warn!("Failed to write error text to stdout: {}", write_err);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

/// Logs go to stderr so stdout carries only results. `RUST_LOG` wins over
/// `--verbose`, which wins over the configured level.
fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = if verbose { "debug" } else { level };
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level {:?}", level))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))
}

fn handle_print_config() -> Result<()> {
    let config_path = get_config_path();
    println!("Config file: {}", config_path.display());
    println!();

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        println!("{}", content);
        Config::load_from(&config_path)
            .with_context(|| format!("Invalid config {}", config_path.display()))?;
    } else {
        println!("(file does not exist, using defaults)");
    }
    Ok(())
}
