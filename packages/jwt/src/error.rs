//! JWT error types

use crate::types::KeyRole;

/// JWT operation result type
pub type JwtResult<T> = Result<T, JwtError>;

/// JWT error types
///
/// Verification never produces one of these: a failed verification is an
/// ordinary `VerifyResult` with `valid_signature == false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    /// Token does not have the compact `header.payload.signature` shape
    #[error("Malformed JWT: {reason}")]
    MalformedToken {
        /// What was wrong with the token text
        reason: String,
    },
    /// A segment or value is not valid base64url
    #[error("Invalid base64url encoding in {segment}")]
    InvalidEncoding {
        /// Which segment or value failed to decode
        segment: String,
    },
    /// Header text is not a JSON object
    #[error("Header is not a valid JSON object: {reason}")]
    InvalidHeaderJson {
        /// Parser message
        reason: String,
    },
    /// Payload text is not valid JSON
    #[error("Payload is not valid JSON: {reason}")]
    InvalidPayloadJson {
        /// Parser message
        reason: String,
    },
    /// Header has no `alg` member
    #[error("Header is missing the \"alg\" parameter")]
    MissingAlgorithm,
    /// `alg` names an algorithm outside the supported twelve
    #[error("Unsupported algorithm: {alg}")]
    UnsupportedAlgorithm {
        /// The algorithm identifier as written
        alg: String,
    },
    /// No supported key format could be parsed from the supplied material
    #[error("Could not resolve {role} key for {alg}: {reason}")]
    KeyResolution {
        /// Algorithm the key was requested for
        alg: String,
        /// Whether a signing or verification key was requested
        role: KeyRole,
        /// Why every candidate format was rejected
        reason: String,
    },
    /// Symmetric material supplied for an asymmetric algorithm, or the reverse
    #[error("Signature material does not fit algorithm {alg}")]
    MaterialMismatch {
        /// Algorithm the material was supplied for
        alg: String,
    },
    /// Algorithm outside the configured pinned set
    #[error("Algorithm {alg} is not in the allowed set")]
    AlgorithmNotAllowed {
        /// The rejected algorithm
        alg: String,
    },
    /// JSON serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// The signature primitive reported an error
    #[error("Signing error: {0}")]
    Signing(String),
    /// Background task failed
    #[error("Background task failed")]
    TaskFailed,
}

impl JwtError {
    /// Create a malformed token error
    #[inline]
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        JwtError::MalformedToken {
            reason: reason.into(),
        }
    }

    /// Create a key resolution error
    #[inline]
    #[must_use]
    pub fn key_resolution(alg: impl Into<String>, role: KeyRole, reason: impl Into<String>) -> Self {
        JwtError::KeyResolution {
            alg: alg.into(),
            role,
            reason: reason.into(),
        }
    }

    /// Create a material mismatch error
    #[inline]
    #[must_use]
    pub fn material_mismatch(alg: impl Into<String>) -> Self {
        JwtError::MaterialMismatch { alg: alg.into() }
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        JwtError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_resolution_message_names_algorithm_and_role() {
        let err = JwtError::key_resolution("RS256", KeyRole::Verification, "no format matched");
        let text = err.to_string();
        assert!(text.contains("RS256"));
        assert!(text.contains("verification"));
        assert!(text.contains("no format matched"));
    }

    #[test]
    fn malformed_carries_reason() {
        assert_eq!(
            JwtError::malformed("expected 3 segments, found 2"),
            JwtError::MalformedToken {
                reason: "expected 3 segments, found 2".to_string()
            }
        );
    }
}
