//! CLI route: single route table and run context.

use crate::cli::command_name;
use crate::cli::output::CommandOutput;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_check_report_json, format_check_report_text, format_manifest_json,
    format_manifest_text,
};
use crate::config::{ConfigLoader, ManifestConfig};
use crate::digest::Algorithm;
use crate::error::{ApiError, ManifestError};
use crate::manifest::ManifestFile;
use crate::verify;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Entry name that stands for standard input
pub const STDIN_NAME: &str = "-";

/// Runtime context for CLI execution: workspace and manifest settings.
pub struct RunContext {
    workspace_root: PathBuf,
    manifest: ManifestConfig,
    color: bool,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Ok(Self::from_manifest_config(workspace_root, config.manifest))
    }

    pub fn from_manifest_config(workspace_root: PathBuf, manifest: ManifestConfig) -> Self {
        Self {
            workspace_root,
            manifest,
            color: false,
        }
    }

    /// Override the manifest file (relative paths resolve against the workspace)
    pub fn with_manifest_file(mut self, file: Option<PathBuf>) -> Self {
        if file.is_some() {
            self.manifest.file = file;
        }
        self
    }

    pub fn with_algorithm(mut self, algorithm: Option<Algorithm>) -> Self {
        if let Some(algorithm) = algorithm {
            self.manifest.algorithm = algorithm;
        }
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn algorithm(&self) -> Algorithm {
        self.manifest.algorithm
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.manifest.resolve_path(&self.workspace_root)
    }

    /// Execute a CLI command, with "-" entries read from the process stdin.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        self.execute_with_input(command, std::io::stdin().lock())
    }

    /// Execute a CLI command via the single route table.
    pub fn execute_with_input<R: Read>(
        &self,
        command: &Commands,
        stdin: R,
    ) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        debug!(command = name, manifest = %self.manifest_path().display(), "Executing command");

        let result = match command {
            Commands::Add { files, no_save } => self.run_add(files, *no_save, stdin),
            Commands::Check { files, format } => self.run_check(files, format, stdin),
            Commands::List { format } => self.run_list(format),
        };

        info!(
            command = name,
            ok = result.as_ref().map(|o| o.success).unwrap_or(false),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn run_add<R: Read>(
        &self,
        files: &[PathBuf],
        no_save: bool,
        mut stdin: R,
    ) -> Result<CommandOutput, ApiError> {
        let mut manifest_file = ManifestFile::open(self.manifest_path(), self.algorithm())?;

        for file in files {
            let name = entry_name(file);
            if name == STDIN_NAME {
                manifest_file.manifest_mut().add(name, &mut stdin)?;
                continue;
            }
            let path = self.workspace_root.join(file);
            let src = File::open(&path).map_err(|e| ApiError::file(&path, e))?;
            manifest_file
                .manifest_mut()
                .add(name, BufReader::new(src))
                .map_err(|e| with_path(&path, e))?;
        }

        if no_save {
            debug!("Skipping manifest save (--no-save)");
        } else {
            manifest_file.save()?;
        }
        Ok(CommandOutput::ok(format_manifest_text(manifest_file.manifest())))
    }

    fn run_check<R: Read>(
        &self,
        files: &[PathBuf],
        format: &str,
        stdin: R,
    ) -> Result<CommandOutput, ApiError> {
        let json = parse_output_format(format)?;
        let manifest_file = ManifestFile::load(self.manifest_path(), self.algorithm())?;
        let names: Vec<String> = files.iter().map(|f| entry_name(f)).collect();

        let mut stdin = Some(stdin);
        let root = &self.workspace_root;
        let report = verify::verify_entries(manifest_file.manifest(), &names, |name| {
            if name == STDIN_NAME {
                return stdin.take().map(EntrySource::Stdin).ok_or_else(|| {
                    std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "standard input already consumed",
                    )
                });
            }
            File::open(root.join(name)).map(|f| EntrySource::File(BufReader::new(f)))
        });

        let text = if json {
            format_check_report_json(&report)?
        } else {
            format_check_report_text(&report, self.color)
        };
        if report.is_success() {
            Ok(CommandOutput::ok(text))
        } else {
            Ok(CommandOutput::failed(text))
        }
    }

    fn run_list(&self, format: &str) -> Result<CommandOutput, ApiError> {
        let json = parse_output_format(format)?;
        let manifest_file = ManifestFile::load(self.manifest_path(), self.algorithm())?;
        let text = if json {
            format_manifest_json(manifest_file.manifest())?
        } else {
            format_manifest_text(manifest_file.manifest())
        };
        Ok(CommandOutput::ok(text))
    }
}

/// Content to verify: standard input or a file under the workspace
enum EntrySource<R> {
    Stdin(R),
    File(BufReader<File>),
}

impl<R: Read> Read for EntrySource<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            EntrySource::Stdin(r) => r.read(buf),
            EntrySource::File(f) => f.read(buf),
        }
    }
}

/// Manifest name for a command-line path: as typed, minus leading `./`.
fn entry_name(file: &Path) -> String {
    let typed = file.to_string_lossy();
    let mut name: &str = &typed;
    while let Some(rest) = name.strip_prefix("./") {
        name = rest.trim_start_matches('/');
    }
    if name.is_empty() {
        typed.into_owned()
    } else {
        name.to_string()
    }
}

/// Returns true for JSON output
fn parse_output_format(format: &str) -> Result<bool, ApiError> {
    match format {
        "text" => Ok(false),
        "json" => Ok(true),
        other => Err(ApiError::ConfigError(format!(
            "Invalid output format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

/// Read failures while hashing a file name the file.
fn with_path(path: &Path, err: ManifestError) -> ApiError {
    match err {
        ManifestError::Io(source) => ApiError::file(path, source),
        other => ApiError::Manifest(other),
    }
}
