//! Digest computation for manifest entries
//!
//! A manifest uses exactly one algorithm. Content is streamed through the
//! hasher in fixed-size chunks, so files are never loaded whole into memory.
//! Digests are always rendered as lowercase hexadecimal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{ErrorKind, Read};
use std::str::FromStr;

/// Chunk size used when streaming content into a hasher
const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Digest algorithm of a manifest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// RFC 1321 MD5, `md5sum` compatible (default)
    #[default]
    Md5,
    /// BLAKE3 with 256-bit output, `b3sum` compatible
    Blake3,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "md5",
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Raw digest length in bytes
    pub fn output_len(&self) -> usize {
        match self {
            Algorithm::Md5 => 16,
            Algorithm::Blake3 => blake3::OUT_LEN,
        }
    }

    /// Length of the hex encoding stored in a manifest
    pub fn hex_len(&self) -> usize {
        self.output_len() * 2
    }

    /// Conventional manifest file name for this algorithm
    pub fn default_manifest_name(&self) -> &'static str {
        match self {
            Algorithm::Md5 => "MD5SUMS",
            Algorithm::Blake3 => "B3SUMS",
        }
    }

    /// Digest a stream, reading it to exhaustion
    pub fn digest_reader<R: Read>(&self, src: R) -> std::io::Result<String> {
        match self {
            Algorithm::Md5 => hash_reader(md5::Context::new(), src),
            Algorithm::Blake3 => hash_reader(blake3::Hasher::new(), src),
        }
    }

    /// Digest an in-memory buffer
    pub fn digest_bytes(&self, content: &[u8]) -> String {
        match self {
            Algorithm::Md5 => hex::encode(md5::compute(content).0),
            Algorithm::Blake3 => hex::encode(blake3::hash(content).as_bytes()),
        }
    }

    /// True when `digest` is a lowercase hex string of exactly `hex_len()` chars
    pub fn is_valid_digest(&self, digest: &str) -> bool {
        digest.len() == self.hex_len()
            && digest
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    /// Validate a digest read from outside and normalize it to lowercase
    pub fn normalize_digest(&self, digest: &str) -> Option<String> {
        let lowered = digest.to_ascii_lowercase();
        self.is_valid_digest(&lowered).then_some(lowered)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Algorithm::Md5),
            "blake3" | "b3" => Ok(Algorithm::Blake3),
            other => Err(format!(
                "Unknown digest algorithm: {} (must be 'md5' or 'blake3')",
                other
            )),
        }
    }
}

/// Incremental hasher fed from a byte stream
trait StreamHasher {
    fn feed(&mut self, data: &[u8]);
    fn finish_hex(self) -> String;
}

impl StreamHasher for md5::Context {
    fn feed(&mut self, data: &[u8]) {
        self.consume(data);
    }

    fn finish_hex(self) -> String {
        hex::encode(self.compute().0)
    }
}

impl StreamHasher for blake3::Hasher {
    fn feed(&mut self, data: &[u8]) {
        self.update(data);
    }

    fn finish_hex(self) -> String {
        hex::encode(self.finalize().as_bytes())
    }
}

fn hash_reader<H: StreamHasher, R: Read>(mut hasher: H, mut src: R) -> std::io::Result<String> {
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = match src.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.feed(&buffer[..read]);
    }
    Ok(hasher.finish_hex())
}
