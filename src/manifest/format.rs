//! Manifest line format: `<hex digest><two spaces><name>\n`

use crate::digest::Algorithm;
use crate::error::ManifestError;

/// Separator between digest and name on a manifest line
pub const SEPARATOR: &str = "  ";

/// Render one manifest line, including the trailing newline
pub fn format_entry(digest: &str, name: &str) -> String {
    let mut line = String::with_capacity(digest.len() + SEPARATOR.len() + name.len() + 1);
    line.push_str(digest);
    line.push_str(SEPARATOR);
    line.push_str(name);
    line.push('\n');
    line
}

/// Split a line (without terminator) into `(digest, name)` on the first separator.
///
/// Later double spaces stay part of the name.
pub fn parse_entry(line: &str) -> Option<(&str, &str)> {
    line.split_once(SEPARATOR)
}

/// Names must survive the line format unchanged.
pub(crate) fn validate_name(name: &str) -> Result<(), ManifestError> {
    if name.is_empty() || name.contains(['\n', '\r']) {
        return Err(ManifestError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Parse a raw line (terminator optional) into `(name, digest)`.
///
/// Blank lines yield `Ok(None)`. `line_no` is 1-based and only used for errors.
pub(crate) fn parse_line(
    algorithm: Algorithm,
    line_no: usize,
    raw: &[u8],
) -> Result<Option<(String, String)>, ManifestError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        return Ok(None);
    }

    let line = std::str::from_utf8(raw).map_err(|_| ManifestError::MalformedEntry {
        line: line_no,
        content: String::from_utf8_lossy(raw).into_owned(),
    })?;

    let (digest, name) = parse_entry(line).ok_or_else(|| ManifestError::MalformedEntry {
        line: line_no,
        content: line.to_string(),
    })?;

    if name.is_empty() {
        return Err(ManifestError::MalformedEntry {
            line: line_no,
            content: line.to_string(),
        });
    }

    let digest = algorithm
        .normalize_digest(digest)
        .ok_or_else(|| ManifestError::InvalidDigest {
            line: line_no,
            digest: digest.to_string(),
        })?;

    Ok(Some((name.to_string(), digest)))
}
