//! sumfile CLI Binary
//!
//! Command-line interface for recording and verifying checksum manifests.

use clap::Parser;
use std::io::{IsTerminal, Write};
use std::process;
use sumfile::cli::{Cli, RunContext};
use sumfile::config::ConfigLoader;
use sumfile::logging::{init_logging, LoggingConfig};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Build logging config from CLI args, env vars, and config file
    let logging_config = build_logging_config(&cli);

    // Initialize logging early
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("sumfile starting");

    let context = match RunContext::new(cli.workspace.clone(), cli.config.clone()) {
        Ok(ctx) => ctx
            .with_manifest_file(cli.manifest.clone())
            .with_algorithm(cli.algorithm)
            .with_color(!cli.no_color && std::io::stdout().is_terminal()),
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", sumfile::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            if let Err(e) = print_output(&output.text) {
                error!("Failed to write output: {}", e);
                eprintln!("sumfile: failed to write output: {}", e);
                process::exit(1);
            }
            if !output.success {
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", sumfile::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Write command output to stdout, newline-terminated
fn print_output(text: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}

/// Build logging configuration from CLI args, environment, and config file
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = if let Some(ref config_path) = cli.config {
        ConfigLoader::load_from_file(config_path)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    } else {
        ConfigLoader::load(&cli.workspace)
            .ok()
            .map(|c| c.logging)
            .unwrap_or_default()
    };

    // Logging stays off unless asked for
    if !cli.verbose && cli.log_level.is_none() {
        config.level = "off".to_string();
        return config;
    }
    if cli.verbose {
        config.level = "debug".to_string();
    }

    // Override with CLI arguments (highest priority)
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }
    if cli.no_color {
        config.color = false;
    }

    config
}
