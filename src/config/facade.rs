//! ConfigLoader: single entry point for building a `SumfileConfig`.

use super::merge_policy;
use super::sources::{global_file, workspace_file};
use super::SumfileConfig;
use crate::error::ApiError;
use config::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads configuration from defaults, files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (highest last): defaults, global file, workspace file, environment.
    pub fn load(workspace_root: &Path) -> Result<SumfileConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let config: SumfileConfig = builder
            .add_source(merge_policy::environment_source())
            .build()?
            .try_deserialize()?;

        debug!(
            workspace = %workspace_root.display(),
            algorithm = %config.manifest.algorithm,
            "Configuration loaded"
        );
        config.ensure_valid()
    }

    /// Load configuration from an explicit file, skipping global and workspace files.
    pub fn load_from_file(path: &Path) -> Result<SumfileConfig, ApiError> {
        if !path.is_file() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        let config: SumfileConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(merge_policy::environment_source())
            .build()?
            .try_deserialize()?;

        debug!(config_path = %path.display(), "Configuration loaded from file");
        config.ensure_valid()
    }

    /// Path of the global config file, if a home directory is known
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Path of the workspace config file
    pub fn workspace_config_path(workspace_root: &Path) -> PathBuf {
        workspace_file::workspace_config_path(workspace_root)
    }
}
