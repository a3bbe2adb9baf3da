//! Common infrastructure for the devbelt crates
//!
//! - Logging bootstrap (`env_logger` behind the `log` facade)
//! - Log-safe fingerprints for secrets and key material

pub mod logging;

use sha2::{Digest, Sha256};

/// Fingerprint sensitive text for logging.
///
/// Returns `#` followed by the first 12 hex characters of the SHA-256 digest,
/// enough to correlate log lines without revealing the input.
#[must_use]
pub fn fingerprint(secret: &[u8]) -> String {
    let hash = Sha256::digest(secret);
    let hex_hash = format!("{hash:x}");
    format!("#{}", &hex_hash[..12])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint(b"your-256-bit-secret");
        let b = fingerprint(b"your-256-bit-secret");
        let c = fingerprint(b"wrong-secret");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with('#'));
        assert_eq!(a.len(), 13);
    }
}
