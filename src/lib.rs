//! sumfile: checksum manifests
//!
//! Records file digests in an `md5sum`-compatible manifest and verifies files
//! against it later to detect corruption or modification.

pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod verify;

pub use digest::Algorithm;
pub use error::{ApiError, ManifestError};
pub use manifest::{Manifest, ManifestFile};
