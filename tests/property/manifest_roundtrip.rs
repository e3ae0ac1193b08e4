//! Property-based tests for manifest serialization and lookup

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::io::Cursor;
use sumfile::{Algorithm, Manifest};

/// Names the line format can carry: non-empty, no line breaks
fn entry_name() -> impl Strategy<Value = String> {
    "[^\r\n]{1,40}"
}

fn entries() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    prop::collection::btree_map(entry_name(), any::<Vec<u8>>(), 0..16)
}

proptest! {
    /// Whatever was added checks against the same content
    #[test]
    fn test_add_then_check_property(name in entry_name(), content in any::<Vec<u8>>()) {
        let mut manifest = Manifest::new();
        manifest.add(name.clone(), Cursor::new(content.clone())).unwrap();
        prop_assert!(manifest.check(&name, Cursor::new(content)).unwrap());
    }

    /// Serialized manifests parse back to the same entries
    #[test]
    fn test_write_read_round_trip_property(files in entries(), blake3 in any::<bool>()) {
        let algorithm = if blake3 { Algorithm::Blake3 } else { Algorithm::Md5 };
        let mut manifest = Manifest::with_algorithm(algorithm);
        for (name, content) in &files {
            manifest.add(name.clone(), Cursor::new(content)).unwrap();
        }

        let mut out = Vec::new();
        let written = manifest.write_to(&mut out).unwrap();
        prop_assert_eq!(written as usize, out.len());

        let mut parsed = Manifest::with_algorithm(algorithm);
        let consumed = parsed.read_from(out.as_slice()).unwrap();
        prop_assert_eq!(consumed, written);
        prop_assert_eq!(parsed, manifest);
    }

    /// Serialization does not depend on insertion order
    #[test]
    fn test_serialization_is_deterministic_property(files in entries()) {
        let mut forward = Manifest::new();
        for (name, content) in files.iter() {
            forward.add(name.clone(), Cursor::new(content)).unwrap();
        }
        let mut backward = Manifest::new();
        for (name, content) in files.iter().rev() {
            backward.add(name.clone(), Cursor::new(content)).unwrap();
        }
        prop_assert_eq!(forward.to_bytes(), backward.to_bytes());
    }

    /// Adding a name twice keeps only the latest digest
    #[test]
    fn test_last_add_wins_property(
        name in entry_name(),
        first in any::<Vec<u8>>(),
        second in any::<Vec<u8>>(),
    ) {
        prop_assume!(first != second);
        let mut manifest = Manifest::new();
        manifest.add(name.clone(), Cursor::new(first.clone())).unwrap();
        manifest.add(name.clone(), Cursor::new(second.clone())).unwrap();

        prop_assert_eq!(manifest.len(), 1);
        prop_assert!(manifest.check(&name, Cursor::new(second)).unwrap());
        prop_assert!(!manifest.check(&name, Cursor::new(first)).unwrap());
    }

    /// Arbitrary input never panics and a failed parse leaves the manifest as it was
    #[test]
    fn test_arbitrary_input_never_panics_property(input in any::<Vec<u8>>()) {
        let mut manifest = Manifest::new();
        manifest.add("kept", Cursor::new(b"kept")).unwrap();
        let before = manifest.clone();

        if manifest.read_from(input.as_slice()).is_err() {
            prop_assert_eq!(manifest, before);
        }
    }
}
