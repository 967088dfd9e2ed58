//! Gzip JSON codec for reference documents.
//!
//! Reference sets are stored as gzip-compressed JSON. A document that
//! cannot be read is an error, never treated as absent.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use formscore_models::{ReferenceSet, REFERENCE_FORMAT_VERSION};
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// File extension of stored reference documents.
pub const REFERENCE_EXTENSION: &str = "json.gz";

/// Compress a `ReferenceSet` to gzip JSON bytes.
pub fn encode_reference_set(set: &ReferenceSet) -> StorageResult<Vec<u8>> {
    let json = serde_json::to_vec(set).map_err(|e| {
        StorageError::Serialization(format!("Failed to serialize reference set: {}", e))
    })?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to gzip reference set: {}", e))
    })?;

    let compressed = encoder.finish().map_err(|e| {
        StorageError::Serialization(format!("Failed to finish gzip encoding: {}", e))
    })?;

    debug!(
        exercise = %set.exercise_key,
        joints = set.curves.len(),
        json_size = json.len(),
        compressed_size = compressed.len(),
        "Encoded reference set"
    );

    Ok(compressed)
}

/// Decompress gzip JSON bytes to a `ReferenceSet`.
///
/// `key` only labels errors. Documents written by another format version
/// are rejected.
pub fn decode_reference_set(key: &str, data: &[u8]) -> StorageResult<ReferenceSet> {
    let mut decoder = GzDecoder::new(data);
    let mut json = String::new();

    if let Err(e) = decoder.read_to_string(&mut json) {
        warn!(key = %key, error = %e, "Failed to decompress reference document");
        return Err(StorageError::corrupt(key, e.to_string()));
    }

    let set = serde_json::from_str::<ReferenceSet>(&json).map_err(|e| {
        warn!(key = %key, error = %e, "Failed to deserialize reference document");
        StorageError::corrupt(key, e.to_string())
    })?;

    if !set.is_current_version() {
        debug!(
            key = %key,
            stored_version = set.format_version,
            current_version = REFERENCE_FORMAT_VERSION,
            "Reference document version mismatch"
        );
        return Err(StorageError::VersionMismatch {
            key: key.to_string(),
            found: set.format_version,
            expected: REFERENCE_FORMAT_VERSION,
        });
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formscore_models::{Joint, VideoParams};

    fn sample_set() -> ReferenceSet {
        ReferenceSet::new("lateral_raise", "Lateral Raise", VideoParams::new(4, 25.0, 1920, 1080))
            .with_curves(Joint::LWrist, vec![0.2, 0.3, 0.4, 0.5], vec![0.8, 0.6, 0.4, 0.3])
            .with_curves(Joint::RWrist, vec![0.8, 0.7, 0.6, 0.5], vec![0.8, 0.6, 0.4, 0.3])
    }

    #[test]
    fn test_encoded_document_is_gzip() {
        let set = sample_set();
        let bytes = encode_reference_set(&set).unwrap();
        assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
        assert_eq!(decode_reference_set("lateral_raise", &bytes).unwrap(), set);
    }

    #[test]
    fn test_rejects_non_gzip_data() {
        let err = decode_reference_set("bicep_curl", b"{\"not\": \"gzipped\"}").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "bicep_curl"));
    }

    #[test]
    fn test_rejects_truncated_document() {
        let bytes = encode_reference_set(&sample_set()).unwrap();
        let err = decode_reference_set("lateral_raise", &bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn test_rejects_other_format_version() {
        let mut set = sample_set();
        set.format_version = REFERENCE_FORMAT_VERSION + 1;
        let bytes = encode_reference_set(&set).unwrap();

        let err = decode_reference_set("lateral_raise", &bytes).unwrap_err();
        assert!(matches!(
            err,
            StorageError::VersionMismatch { found, expected, .. }
                if found == REFERENCE_FORMAT_VERSION + 1 && expected == REFERENCE_FORMAT_VERSION
        ));
    }
}
