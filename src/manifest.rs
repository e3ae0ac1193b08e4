//! Checksum manifest
//!
//! A [`Manifest`] maps file names to content digests and reads/writes the
//! `md5sum` line format. Entries are kept ordered by name, so serialization is
//! deterministic. The manifest never owns the streams it is handed: callers
//! open and close them.
//!
//! Besides the explicit [`Manifest::write_to`] / [`Manifest::read_from`]
//! calls, a manifest is itself a byte source ([`Read`]) and byte sink
//! ([`Write`]), so it can be used with `std::io::copy` against files or other
//! manifests.

pub mod file;
pub mod format;

pub use file::ManifestFile;

use crate::digest::Algorithm;
use crate::error::ManifestError;
use std::collections::BTreeMap;
use std::io::{BufRead, BufReader, Cursor, Read, Write};
use tracing::{debug, trace};

/// Name → hex digest mapping
pub type Entries = BTreeMap<String, String>;

/// Entries parsed by `Write`, bytes consumed, last line number
type StagedLines = (Vec<(String, String)>, usize, usize);

#[derive(Debug, Clone, Default)]
pub struct Manifest {
    algorithm: Algorithm,
    entries: Entries,
    /// Serialized form being drained by `Read`
    snapshot: Option<Cursor<Vec<u8>>>,
    /// Bytes received by `Write` that do not yet form a complete line
    pending: Vec<u8>,
    /// Lines consumed by `Write`, for error line numbers
    lines_written: usize,
}

impl Manifest {
    /// Empty MD5 manifest
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_algorithm(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Deserialize a manifest from its text form
    pub fn parse(algorithm: Algorithm, bytes: &[u8]) -> Result<Self, ManifestError> {
        let mut manifest = Self::with_algorithm(algorithm);
        manifest.read_from(bytes)?;
        Ok(manifest)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Current name → digest mapping
    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    /// Digest `src` to exhaustion and record it under `name`.
    ///
    /// An existing entry for `name` is overwritten.
    pub fn add<R: Read>(&mut self, name: impl Into<String>, src: R) -> Result<(), ManifestError> {
        let name = name.into();
        format::validate_name(&name)?;
        let digest = self.algorithm.digest_reader(src)?;
        debug!(name = %name, digest = %digest, algorithm = %self.algorithm, "Recorded manifest entry");
        self.entries.insert(name, digest);
        Ok(())
    }

    /// Digest `src` and compare it with the recorded digest for `name`.
    ///
    /// An unknown name is not an error: it never matches.
    pub fn check<R: Read>(&self, name: &str, src: R) -> Result<bool, ManifestError> {
        let actual = self.algorithm.digest_reader(src)?;
        let expected = self.entries.get(name);
        let matches = expected.is_some_and(|expected| *expected == actual);
        debug!(
            name = %name,
            expected = expected.map(String::as_str).unwrap_or("<none>"),
            actual = %actual,
            matches,
            "Checked manifest entry"
        );
        Ok(matches)
    }

    /// Serialize every entry as `<digest>  <name>\n`.
    ///
    /// Returns the number of bytes written. On failure the error carries the
    /// byte count written before the failing line.
    pub fn write_to<W: Write>(&self, mut output: W) -> Result<u64, ManifestError> {
        let mut written = 0u64;
        for (name, digest) in &self.entries {
            let line = format::format_entry(digest, name);
            output
                .write_all(line.as_bytes())
                .map_err(|source| ManifestError::PartialWrite { written, source })?;
            written += line.len() as u64;
        }
        output
            .flush()
            .map_err(|source| ManifestError::PartialWrite { written, source })?;
        debug!(entries = self.entries.len(), bytes = written, "Wrote manifest");
        Ok(written)
    }

    /// Parse manifest lines from `input` and merge them into the entries.
    ///
    /// Blank lines are skipped; later lines win over earlier ones and over
    /// existing entries. Nothing is merged unless the whole input parses.
    /// Returns the number of bytes consumed, line terminators included.
    pub fn read_from<R: Read>(&mut self, input: R) -> Result<u64, ManifestError> {
        let mut reader = BufReader::new(input);
        let mut staged = Vec::new();
        let mut consumed = 0u64;
        let mut line_no = 0usize;
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = reader.read_until(b'\n', &mut line)?;
            if read == 0 {
                break;
            }
            consumed += read as u64;
            line_no += 1;
            if let Some(entry) = format::parse_line(self.algorithm, line_no, &line)? {
                trace!(name = %entry.0, line = line_no, "Parsed manifest line");
                staged.push(entry);
            }
        }

        let parsed = staged.len();
        self.entries.extend(staged);
        debug!(entries = parsed, bytes = consumed, "Read manifest");
        Ok(consumed)
    }

    /// Serialized form of all entries
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (name, digest) in &self.entries {
            bytes.extend_from_slice(format::format_entry(digest, name).as_bytes());
        }
        bytes
    }

    /// Parse the complete lines of `bytes` without touching the entries.
    ///
    /// Returns the parsed entries, the offset just past the last newline and
    /// the number of the last line parsed.
    fn stage_complete_lines(&self, bytes: &[u8]) -> Result<StagedLines, ManifestError> {
        let mut staged = Vec::new();
        let mut start = 0;
        let mut line_no = self.lines_written;
        while let Some(offset) = bytes[start..].iter().position(|&b| b == b'\n') {
            let end = start + offset + 1;
            line_no += 1;
            if let Some(entry) = format::parse_line(self.algorithm, line_no, &bytes[start..end])? {
                staged.push(entry);
            }
            start = end;
        }
        Ok((staged, start, line_no))
    }
}

impl PartialEq for Manifest {
    fn eq(&self, other: &Self) -> bool {
        self.algorithm == other.algorithm && self.entries == other.entries
    }
}

impl Eq for Manifest {}

/// Byte source over the serialized entries.
///
/// The serialized form is built on the first read and drained by later reads.
/// Once drained, `Ok(0)` is returned and the next read starts over from the
/// current entries.
impl Read for Manifest {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut snapshot = self
            .snapshot
            .take()
            .unwrap_or_else(|| Cursor::new(self.to_bytes()));
        let read = snapshot.read(buf)?;
        if read > 0 || buf.is_empty() {
            self.snapshot = Some(snapshot);
        }
        Ok(read)
    }
}

/// Byte sink that parses manifest lines as they arrive.
///
/// Lines may be split across `write` calls; each complete line is merged into
/// the entries immediately. `flush` merges a trailing unterminated line.
/// Malformed lines surface as `InvalidData` errors. A failed `write` consumes
/// nothing: no line of that call is merged and the buffered bytes stay as they
/// were before it.
impl Write for Manifest {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut buffered = self.pending.clone();
        buffered.extend_from_slice(buf);
        let (staged, consumed, line_no) = self.stage_complete_lines(&buffered)?;

        buffered.drain(..consumed);
        self.lines_written = line_no;
        self.pending = buffered;
        self.entries.extend(staged);
        Ok(buf.len())
    }

    /// Merge the unterminated remainder and start line numbering over.
    ///
    /// The remainder is dropped even when it fails to parse.
    fn flush(&mut self) -> std::io::Result<()> {
        let line = std::mem::take(&mut self.pending);
        let line_no = self.lines_written + 1;
        self.lines_written = 0;
        if !line.is_empty() {
            if let Some((name, digest)) = format::parse_line(self.algorithm, line_no, &line)? {
                self.entries.insert(name, digest);
            }
        }
        Ok(())
    }
}
