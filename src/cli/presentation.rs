//! CLI presentation: text and JSON rendering of manifests and verify reports.

use crate::error::ApiError;
use crate::manifest::Manifest;
use crate::verify::{CheckStatus, VerifyReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

/// Manifest in its on-disk line format
pub fn format_manifest_text(manifest: &Manifest) -> String {
    String::from_utf8_lossy(&manifest.to_bytes()).into_owned()
}

pub fn format_manifest_json(manifest: &Manifest) -> Result<String, ApiError> {
    let entries: Vec<_> = manifest
        .entries()
        .iter()
        .map(|(name, digest)| json!({ "name": name, "digest": digest }))
        .collect();
    let value = json!({
        "algorithm": manifest.algorithm().name(),
        "entries": entries,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// One `name: STATUS` line per entry, md5sum `--check` style, then a summary table.
pub fn format_check_report_text(report: &VerifyReport, color: bool) -> String {
    if report.total() == 0 {
        return "No entries to check\n".to_string();
    }

    let mut out = String::new();
    for outcome in &report.outcomes {
        let status = match &outcome.status {
            CheckStatus::Ok => paint("OK", color, true),
            CheckStatus::Failed => paint("FAILED", color, false),
            CheckStatus::Missing { reason } => {
                format!("{} open or read ({})", paint("FAILED", color, false), reason)
            }
            CheckStatus::Untracked => {
                format!("{} (not in manifest)", paint("FAILED", color, false))
            }
        };
        out.push_str(&format!("{}: {}\n", outcome.name, status));
    }

    let missing = report.count(|s| matches!(s, CheckStatus::Missing { .. }));
    let untracked = report.count(|s| *s == CheckStatus::Untracked);
    let mismatched = report.count(|s| *s == CheckStatus::Failed);

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Checked", "OK", "Mismatched", "Unreadable", "Untracked"]);
    table.add_row(vec![
        report.total().to_string(),
        report.passed().to_string(),
        mismatched.to_string(),
        missing.to_string(),
        untracked.to_string(),
    ]);
    out.push('\n');
    out.push_str(&format!("{}\n", table));

    if mismatched > 0 {
        out.push_str(&format!(
            "WARNING: {} computed checksum{} did NOT match\n",
            mismatched,
            if mismatched == 1 { "" } else { "s" }
        ));
    }
    if missing > 0 {
        out.push_str(&format!(
            "WARNING: {} listed file{} could not be read\n",
            missing,
            if missing == 1 { "" } else { "s" }
        ));
    }
    out
}

pub fn format_check_report_json(report: &VerifyReport) -> Result<String, ApiError> {
    let value = json!({
        "success": report.is_success(),
        "checked": report.total(),
        "passed": report.passed(),
        "failed": report.failed(),
        "outcomes": report.outcomes,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

fn paint(label: &str, color: bool, good: bool) -> String {
    match (color, good) {
        (false, _) => label.to_string(),
        (true, true) => label.green().to_string(),
        (true, false) => label.red().bold().to_string(),
    }
}
