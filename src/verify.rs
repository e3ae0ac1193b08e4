//! Verification of manifest entries against current content
//!
//! Runs [`Manifest::check`] for every selected entry. Unreadable files and
//! unknown names are reported per entry; they never abort the run.

use crate::manifest::Manifest;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};

/// Result of checking one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckStatus {
    /// Digest matches the manifest
    Ok,
    /// Digest differs from the manifest
    Failed,
    /// Content could not be opened or read
    Missing { reason: String },
    /// Name has no manifest entry
    Untracked,
}

impl CheckStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: CheckStatus,
}

/// Outcomes in check order
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl VerifyReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn count(&self, predicate: impl Fn(&CheckStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(&o.status)).count()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

/// Check entries, opening content through `open`.
///
/// With an empty `names`, every manifest entry is checked in name order;
/// otherwise exactly the given names, in the given order.
pub fn verify_entries<F, R>(manifest: &Manifest, names: &[String], mut open: F) -> VerifyReport
where
    F: FnMut(&str) -> std::io::Result<R>,
    R: Read,
{
    let selected: Vec<String> = if names.is_empty() {
        manifest.entries().keys().cloned().collect()
    } else {
        names.to_vec()
    };

    let mut report = VerifyReport::default();
    for name in selected {
        let status = check_one(manifest, &name, &mut open);
        debug!(name = %name, status = ?status, "Verified entry");
        report.outcomes.push(CheckOutcome { name, status });
    }
    report
}

/// Check entries against files under `root`
pub fn verify_in_dir(manifest: &Manifest, root: &Path, names: &[String]) -> VerifyReport {
    verify_entries(manifest, names, |name| {
        File::open(root.join(name)).map(BufReader::new)
    })
}

fn check_one<F, R>(manifest: &Manifest, name: &str, open: &mut F) -> CheckStatus
where
    F: FnMut(&str) -> std::io::Result<R>,
    R: Read,
{
    if !manifest.contains(name) {
        return CheckStatus::Untracked;
    }
    let src = match open(name) {
        Ok(src) => src,
        Err(e) => {
            warn!(name = %name, error = %e, "Failed to open entry for verification");
            return CheckStatus::Missing {
                reason: e.to_string(),
            };
        }
    };
    match manifest.check(name, src) {
        Ok(true) => CheckStatus::Ok,
        Ok(false) => CheckStatus::Failed,
        Err(e) => {
            warn!(name = %name, error = %e, "Failed to read entry for verification");
            CheckStatus::Missing {
                reason: e.to_string(),
            }
        }
    }
}
