//! Manifest contract tests: add, check, serialize, parse.

use std::io::{self, Cursor, Read, Write};
use sumfile::{Algorithm, Manifest, ManifestError};

const TEST_DIGEST: &str = "098f6bcd4621d373cade4e832627b4f6";

#[test]
fn test_known_vector_line() {
    let mut manifest = Manifest::new();
    manifest.add("a.txt", Cursor::new(b"test")).unwrap();

    let mut result = Vec::new();
    io::copy(&mut manifest, &mut result).unwrap();

    assert_eq!(
        String::from_utf8(result).unwrap(),
        "098f6bcd4621d373cade4e832627b4f6  a.txt\n"
    );
}

#[test]
fn test_parse_known_line() {
    let manifest = Manifest::parse(
        Algorithm::Md5,
        b"098f6bcd4621d373cade4e832627b4f6  a.txt\n",
    )
    .unwrap();
    assert_eq!(manifest.entries().get("a.txt").map(String::as_str), Some(TEST_DIGEST));
}

#[test]
fn test_write_to_read_from_round_trip() {
    let mut original = Manifest::new();
    original.add("a.txt", Cursor::new(b"alpha")).unwrap();
    original.add("dir/b.txt", Cursor::new(b"beta")).unwrap();
    original.add("name  with  spaces", Cursor::new(b"gamma")).unwrap();
    original.add("-", Cursor::new(b"stdin")).unwrap();

    let mut serialized = Vec::new();
    let written = original.write_to(&mut serialized).unwrap();

    let mut restored = Manifest::new();
    let consumed = restored.read_from(serialized.as_slice()).unwrap();

    assert_eq!(written, consumed);
    assert_eq!(restored.entries(), original.entries());
}

#[test]
fn test_check_uses_fresh_stream() {
    let content = b"some file content".to_vec();
    let mut manifest = Manifest::new();
    manifest.add("f", Cursor::new(content.clone())).unwrap();

    assert!(manifest.check("f", Cursor::new(content)).unwrap());
    assert!(!manifest.check("f", Cursor::new(b"other".to_vec())).unwrap());
    assert!(!manifest.check("never-added", Cursor::new(b"x".to_vec())).unwrap());
}

#[test]
fn test_caller_keeps_stream_ownership() {
    let mut manifest = Manifest::new();
    let mut src = Cursor::new(b"test".to_vec());
    manifest.add("a.txt", &mut src).unwrap();

    // The stream was read to exhaustion but is still ours
    assert_eq!(src.position(), 4);
    let mut rest = Vec::new();
    src.read_to_end(&mut rest).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn test_malformed_line_is_reported_not_panicking() {
    let mut manifest = Manifest::new();
    let err = manifest
        .read_from(&b"098f6bcd4621d373cade4e832627b4f6 a.txt\n"[..])
        .unwrap_err();
    assert!(matches!(err, ManifestError::MalformedEntry { line: 1, .. }));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_digest_of_wrong_algorithm_is_rejected() {
    let err = Manifest::parse(Algorithm::Blake3, b"098f6bcd4621d373cade4e832627b4f6  a.txt\n")
        .unwrap_err();
    assert!(matches!(err, ManifestError::InvalidDigest { line: 1, .. }));
}

#[test]
fn test_blake3_manifest_round_trip() {
    let mut manifest = Manifest::with_algorithm(Algorithm::Blake3);
    manifest.add("a.txt", Cursor::new(b"test")).unwrap();
    let digest = manifest.get("a.txt").unwrap().to_string();
    assert_eq!(digest.len(), 64);

    let restored = Manifest::parse(Algorithm::Blake3, &manifest.to_bytes()).unwrap();
    assert_eq!(restored, manifest);
}

#[test]
fn test_copy_manifest_into_manifest_and_file_like_sink() {
    let mut source = Manifest::new();
    source.add("one", Cursor::new(b"1")).unwrap();
    source.add("two", Cursor::new(b"2")).unwrap();

    let mut target = Manifest::new();
    target.add("three", Cursor::new(b"3")).unwrap();
    io::copy(&mut source, &mut target).unwrap();
    target.flush().unwrap();

    assert_eq!(target.len(), 3);
    assert_eq!(target.get("one"), source.get("one"));

    // Draining again yields the same bytes
    let mut again = Vec::new();
    source.read_to_end(&mut again).unwrap();
    assert_eq!(again, source.to_bytes());
}
