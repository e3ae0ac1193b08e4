//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file, then
//! the workspace `.sumfile.toml`, then `SUMFILE__*` environment variables. CLI
//! flags are applied on top by the binary.

use crate::digest::Algorithm;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod facade;
mod merge_policy;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SumfileConfig {
    /// Manifest location and algorithm
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Manifest settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Digest algorithm for the whole manifest
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Manifest file; relative paths resolve against the workspace.
    /// Defaults to the algorithm's conventional name (MD5SUMS, B3SUMS).
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl ManifestConfig {
    /// Manifest path for a workspace
    pub fn resolve_path(&self, workspace_root: &Path) -> PathBuf {
        let file = self
            .file
            .clone()
            .unwrap_or_else(|| PathBuf::from(self.algorithm.default_manifest_name()));
        if file.is_absolute() {
            file
        } else {
            workspace_root.join(file)
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(file) = &self.file {
            if file.as_os_str().is_empty() {
                return Err("Manifest file cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Manifest(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Manifest(msg) => write!(f, "Manifest: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl SumfileConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.manifest.validate() {
            errors.push(ValidationError::Manifest(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all errors into one `ApiError`
    pub fn ensure_valid(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })?;
        Ok(self)
    }
}
