//! crates/om_io/src/hasher.rs
//!
//! SHA-256 helpers. Hex digests are **lowercase**.
//!
//! - `sha256_hex` / `sha256_file` hash raw bytes (the CSV source).
//! - `sha256_canonical` hashes any serializable value through canonical JSON,
//!   so two runs over the same views produce the same fingerprint.

#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use om_core::ids::SourceDigest;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::canonical_json::to_canonical_bytes;
use crate::IoError;

/// SHA-256 over raw bytes.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 over a file's raw bytes, streamed.
pub fn sha256_file(path: &Path) -> Result<String, IoError> {
    let f = File::open(path).map_err(|e| IoError::Read { path: path.display().to_string(), msg: e.to_string() })?;
    let mut reader = BufReader::new(f);
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 over **canonical JSON bytes** of any serializable value.
pub fn sha256_canonical<T: Serialize>(value: &T) -> Result<String, IoError> {
    let bytes = to_canonical_bytes(value)?;
    Ok(sha256_hex(&bytes))
}

/// Typed digest of raw source bytes.
pub fn source_digest(bytes: &[u8]) -> Result<SourceDigest, IoError> {
    SourceDigest::from_str(&sha256_hex(bytes)).map_err(|e| IoError::Hash(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn file_and_bytes_agree() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"Country,Year\nUSA,2016\n").unwrap();
        assert_eq!(sha256_file(f.path()).unwrap(), sha256_hex(b"Country,Year\nUSA,2016\n"));
    }

    #[test]
    fn canonical_hash_ignores_key_order() {
        let a = serde_json::json!({"b": 1, "a": [1, 2]});
        let b = serde_json::json!({"a": [1, 2], "b": 1});
        assert_eq!(sha256_canonical(&a).unwrap(), sha256_canonical(&b).unwrap());
    }
}
