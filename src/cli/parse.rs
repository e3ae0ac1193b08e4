//! CLI parse: clap types for sumfile. No behavior; definitions only.

use crate::digest::Algorithm;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sumfile - record and verify checksum manifests
#[derive(Parser)]
#[command(name = "sumfile")]
#[command(about = "Record and verify md5sum-style checksum manifests")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace directory; entry names and the manifest path resolve against it
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Manifest file (default: MD5SUMS, or B3SUMS for blake3)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Digest algorithm for the manifest
    #[arg(long, value_enum)]
    pub algorithm: Option<Algorithm>,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Digest files and record them in the manifest ("-" reads standard input)
    Add {
        /// Files to record
        files: Vec<PathBuf>,

        /// Print the resulting manifest without writing it back
        #[arg(long)]
        no_save: bool,
    },
    /// Verify files against the manifest
    Check {
        /// Entries to verify (default: every entry)
        files: Vec<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Print the manifest
    List {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}
