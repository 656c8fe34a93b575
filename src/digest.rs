//! SHA256 digest utilities for layer blobs
//!
//! Layer content is addressed by an algorithm-tagged digest string
//! (`sha256:<hex>`). The push pipeline only ever compares digests and checks
//! their format; computing them is left to callers producing descriptors and
//! to the tests.

use crate::error::{PushError, Result};
use sha2::Digest;

/// Utilities for working with algorithm-tagged content digests
pub struct DigestUtils;

impl DigestUtils {
    /// Compute SHA256 hex digest from byte data
    pub fn compute_sha256(data: &[u8]) -> String {
        let mut hasher = sha2::Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    /// Compute full layer digest (with sha256: prefix) from byte data
    pub fn compute_layer_digest(data: &[u8]) -> String {
        format!("sha256:{}", Self::compute_sha256(data))
    }

    /// Validate SHA256 hex string (64 characters, all hex)
    pub fn is_valid_sha256_hex(digest: &str) -> bool {
        digest.len() == 64 && digest.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Validate full layer digest format (sha256:xxxxx)
    pub fn is_valid_layer_digest(digest: &str) -> bool {
        if let Some(hex_part) = digest.strip_prefix("sha256:") {
            Self::is_valid_sha256_hex(hex_part)
        } else {
            false
        }
    }

    /// Verify data matches expected digest
    pub fn verify_data_integrity(data: &[u8], expected_digest: &str) -> Result<()> {
        if !Self::is_valid_layer_digest(expected_digest) {
            return Err(PushError::Validation(format!(
                "Invalid digest format: {}",
                expected_digest
            )));
        }
        let computed = Self::compute_layer_digest(data);
        if computed != expected_digest {
            return Err(PushError::DigestMismatch {
                expected: expected_digest.to_string(),
                actual: computed,
            });
        }
        Ok(())
    }

    /// Format digest for display (truncated for readability)
    pub fn format_digest_short(digest: &str) -> String {
        if digest.len() > 23 {
            format!("{}...", &digest[..23])
        } else {
            digest.to_string()
        }
    }
}
