//! CLI help: stable command names for logs.

use crate::cli::parse::Commands;

/// Short command name used in log fields.
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::Check { .. } => "check",
        Commands::List { .. } => "list",
    }
}
