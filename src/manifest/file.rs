//! Manifest file on disk: open-or-create and atomic save.

use crate::digest::Algorithm;
use crate::error::ApiError;
use crate::manifest::Manifest;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A manifest bound to its on-disk location
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
    manifest: Manifest,
}

impl ManifestFile {
    /// Load the manifest at `path`, or start empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, algorithm: Algorithm) -> Result<Self, ApiError> {
        let path = path.into();
        match File::open(&path) {
            Ok(file) => Self::from_file(path, file, algorithm),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Manifest file not found, starting empty");
                Ok(Self {
                    path,
                    manifest: Manifest::with_algorithm(algorithm),
                })
            }
            Err(e) => Err(ApiError::file(path, e)),
        }
    }

    /// Load the manifest at `path`; the file must exist.
    pub fn load(path: impl Into<PathBuf>, algorithm: Algorithm) -> Result<Self, ApiError> {
        let path = path.into();
        let file = File::open(&path).map_err(|e| ApiError::file(&path, e))?;
        Self::from_file(path, file, algorithm)
    }

    fn from_file(path: PathBuf, file: File, algorithm: Algorithm) -> Result<Self, ApiError> {
        let mut manifest = Manifest::with_algorithm(algorithm);
        let bytes = manifest.read_from(file)?;
        debug!(
            path = %path.display(),
            entries = manifest.len(),
            bytes,
            "Loaded manifest file"
        );
        Ok(Self { path, manifest })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn manifest_mut(&mut self) -> &mut Manifest {
        &mut self.manifest
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    /// Write the manifest back to its path atomically
    ///
    /// Uses temporary file + rename. Returns the number of bytes written.
    pub fn save(&self) -> Result<u64, ApiError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ApiError::file(parent, e))?;
            }
        }

        let temp_path = temp_path_for(&self.path);
        let written = match self.write_temp(&temp_path) {
            Ok(written) => written,
            Err(e) => {
                let _ = fs::remove_file(&temp_path);
                return Err(e);
            }
        };

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ApiError::file(&self.path, e)
        })?;

        info!(
            path = %self.path.display(),
            entries = self.manifest.len(),
            bytes = written,
            "Saved manifest file"
        );
        Ok(written)
    }

    fn write_temp(&self, temp_path: &Path) -> Result<u64, ApiError> {
        let file = File::create(temp_path).map_err(|e| ApiError::file(temp_path, e))?;
        let mut writer = BufWriter::new(file);
        let written = self.manifest.write_to(&mut writer)?;
        let file = writer
            .into_inner()
            .map_err(|e| ApiError::file(temp_path, e.into_error()))?;
        file.sync_all().map_err(|e| ApiError::file(temp_path, e))?;
        Ok(written)
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
