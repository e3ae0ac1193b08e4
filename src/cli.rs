//! CLI domain: parse, route, help, output, and presentation only.
//! No domain logic; a single route table dispatches to the manifest services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{map_error, CommandOutput};
pub use parse::{Cli, Commands};
pub use presentation::{
    format_check_report_json, format_check_report_text, format_manifest_json,
    format_manifest_text,
};
pub use route::{RunContext, STDIN_NAME};
