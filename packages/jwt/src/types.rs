//! JWT type definitions

use crate::{
    algorithms::{Algorithm, AlgorithmFamily},
    error::{JwtError, JwtResult},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Decoded JOSE header. Any JSON object is accepted; member order is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// Header with `alg` set and `typ: "JWT"`.
    #[must_use]
    pub fn new(alg: Algorithm) -> Self {
        let mut map = Map::new();
        map.insert("alg".to_string(), Value::String(alg.to_string()));
        map.insert("typ".to_string(), Value::String("JWT".to_string()));
        Self(map)
    }

    /// Wrap an existing JSON object.
    #[must_use]
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse header text. Anything but a JSON object is rejected.
    pub fn from_json_str(text: &str) -> JwtResult<Self> {
        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(Self(map)),
            Ok(_) => Err(JwtError::InvalidHeaderJson {
                reason: "header must be a JSON object".to_string(),
            }),
            Err(err) => Err(JwtError::InvalidHeaderJson {
                reason: err.to_string(),
            }),
        }
    }

    /// Raw `alg` member, if it is a string.
    #[must_use]
    pub fn alg(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// Parsed `alg` member.
    pub fn algorithm(&self) -> JwtResult<Algorithm> {
        self.alg().ok_or(JwtError::MissingAlgorithm)?.parse()
    }

    /// `typ` member, if it is a string.
    #[must_use]
    pub fn typ(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Replace `alg`, keeping every other member and its position.
    pub fn set_algorithm(&mut self, alg: Algorithm) {
        self.0
            .insert("alg".to_string(), Value::String(alg.to_string()));
    }

    /// Underlying JSON object.
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Compact JSON text.
    pub fn to_json(&self) -> JwtResult<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

/// Token payload.
///
/// Payloads that parse as JSON are kept as values. Anything else is kept as
/// the decoded text so it can be shown and re-signed unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Parsed JSON; usually an object
    Json(Value),
    /// Text that is not JSON
    Raw(String),
}

impl Default for Payload {
    fn default() -> Self {
        Payload::Json(Value::Object(Map::new()))
    }
}

impl Payload {
    /// Parse payload text typed by a user. Only valid JSON is accepted.
    pub fn from_json_str(text: &str) -> JwtResult<Self> {
        serde_json::from_str(text)
            .map(Payload::Json)
            .map_err(|err| JwtError::InvalidPayloadJson {
                reason: err.to_string(),
            })
    }

    /// Interpret decoded segment bytes: JSON if possible, text otherwise.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Raw(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// The claims object, when the payload is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            Payload::Json(Value::Object(map)) => Some(map),
            _ => None,
        }
    }

    /// Bytes that go into the payload segment. Raw text passes through as is.
    pub fn to_segment_bytes(&self) -> JwtResult<Vec<u8>> {
        match self {
            Payload::Json(value) => Ok(serde_json::to_vec(value)?),
            Payload::Raw(text) => Ok(text.as_bytes().to_vec()),
        }
    }
}

/// Non-fatal problem found while decoding a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeWarning {
    /// Header segment has characters outside the base64url alphabet
    HeaderBase64Invalid,
    /// Payload segment has characters outside the base64url alphabet
    PayloadBase64Invalid,
    /// Signature segment has characters outside the base64url alphabet
    SignatureBase64Invalid,
    /// Payload is not a JSON object
    PayloadInvalidJson,
}

impl DecodeWarning {
    /// User-facing explanation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            DecodeWarning::HeaderBase64Invalid => {
                "Looks like your JWT header is not encoded correctly using base64url (https://tools.ietf.org/html/rfc4648#section-5). Note that padding (\"=\") must be omitted as per https://tools.ietf.org/html/rfc7515#section-2"
            }
            DecodeWarning::PayloadBase64Invalid => {
                "Looks like your JWT payload is not encoded correctly using base64url (https://tools.ietf.org/html/rfc4648#section-5). Note that padding (\"=\") must be omitted as per https://tools.ietf.org/html/rfc7515#section-2"
            }
            DecodeWarning::SignatureBase64Invalid => {
                "Looks like your JWT signature is not encoded correctly using base64url (https://tools.ietf.org/html/rfc4648#section-5). Note that padding (\"=\") must be omitted as per https://tools.ietf.org/html/rfc7515#section-2"
            }
            DecodeWarning::PayloadInvalidJson => {
                "Looks like your JWT payload is not a valid JSON object. JWT payloads must be top level JSON objects as per https://tools.ietf.org/html/rfc7519#section-7.2"
            }
        }
    }
}

impl fmt::Display for DecodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of a lenient decode.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    /// Parsed header; `None` when the token could not be split or the header is not an object
    pub header: Option<Header>,
    /// Parsed or raw payload
    pub payload: Payload,
    /// Whether decoding failed outright
    pub errors: bool,
    /// Recoverable problems, in the order they were found
    pub warnings: Vec<DecodeWarning>,
}

impl DecodeResult {
    pub(crate) fn failed() -> Self {
        Self {
            header: None,
            payload: Payload::default(),
            errors: true,
            warnings: Vec::new(),
        }
    }

    /// Warning texts for display.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<&'static str> {
        self.warnings.iter().map(|w| w.message()).collect()
    }
}

/// Result of a verification. Never an error: anything that goes wrong is
/// reported as `valid_signature == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyResult {
    /// Signature checked out against the supplied material
    pub valid_signature: bool,
    /// All three segments use only the unpadded base64url alphabet
    pub valid_base64: bool,
    /// Header as protected by the signature; only set when valid
    pub verified_header: Option<Header>,
    /// Payload as protected by the signature; only set when valid
    pub verified_payload: Option<Payload>,
}

impl VerifyResult {
    pub(crate) fn invalid(valid_base64: bool) -> Self {
        Self {
            valid_signature: false,
            valid_base64,
            verified_header: None,
            verified_payload: None,
        }
    }
}

/// Overall state of a token as shown to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// Signature verified
    Verified,
    /// Token decodes but the signature does not check out
    InvalidSignature,
    /// Token could not be decoded at all
    Malformed,
}

impl TokenStatus {
    /// Classify a token from its decode and verify results.
    #[must_use]
    pub fn classify(decoded: &DecodeResult, verified: &VerifyResult) -> Self {
        if verified.valid_signature {
            TokenStatus::Verified
        } else if decoded.errors {
            TokenStatus::Malformed
        } else {
            TokenStatus::InvalidSignature
        }
    }

    /// Short status text shown next to the editor.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            TokenStatus::Verified => "signature verified",
            TokenStatus::InvalidSignature => "invalid signature",
            TokenStatus::Malformed => "Invalid JWT",
        }
    }
}

/// Whether a key is wanted for producing or for checking signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    /// Private key or shared secret used to sign
    Signing,
    /// Public key or shared secret used to verify
    Verification,
}

impl fmt::Display for KeyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRole::Signing => f.write_str("signing"),
            KeyRole::Verification => f.write_str("verification"),
        }
    }
}

/// Key material as entered by a user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SignatureMaterial {
    /// Shared secret for HMAC algorithms
    Symmetric {
        /// Secret text
        key: String,
        /// Whether `key` is base64 text to be decoded before use
        #[serde(default)]
        base64_encoded: bool,
    },
    /// Key pair for RSA, RSA-PSS and ECDSA algorithms
    Asymmetric {
        /// PEM, certificate or JWK text of the public key
        public_key: String,
        /// PEM or JWK text of the private key
        private_key: String,
    },
}

impl SignatureMaterial {
    /// Plain-text shared secret.
    #[must_use]
    pub fn secret(key: impl Into<String>) -> Self {
        SignatureMaterial::Symmetric {
            key: key.into(),
            base64_encoded: false,
        }
    }

    /// Key pair material.
    #[must_use]
    pub fn key_pair(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        SignatureMaterial::Asymmetric {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Whether this kind of material can serve the given family.
    #[must_use]
    pub fn fits(&self, family: AlgorithmFamily) -> bool {
        matches!(self, SignatureMaterial::Symmetric { .. }) == family.is_symmetric()
    }
}

impl fmt::Debug for SignatureMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureMaterial::Symmetric { base64_encoded, .. } => f
                .debug_struct("Symmetric")
                .field("key", &"<redacted>")
                .field("base64_encoded", base64_encoded)
                .finish(),
            SignatureMaterial::Asymmetric { public_key, .. } => f
                .debug_struct("Asymmetric")
                .field("public_key", public_key)
                .field("private_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Verification policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOptions {
    /// When set, tokens whose `alg` is not listed never verify
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_algorithms: Option<Vec<Algorithm>>,
}

impl VerifyOptions {
    /// Trust whatever `alg` the token header names.
    #[must_use]
    pub fn trust_header() -> Self {
        Self::default()
    }

    /// Only accept the listed algorithms.
    #[must_use]
    pub fn pinned(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Self {
            allowed_algorithms: Some(algorithms.into_iter().collect()),
        }
    }

    /// Check `alg` against the pinned set.
    pub fn check(&self, alg: Algorithm) -> JwtResult<()> {
        match &self.allowed_algorithms {
            Some(allowed) if !allowed.contains(&alg) => Err(JwtError::AlgorithmNotAllowed {
                alg: alg.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_keeps_member_order_when_alg_changes() {
        let mut header = Header::from_json_str(r#"{"typ":"JWT","kid":"k1","alg":"HS256"}"#).unwrap();
        header.set_algorithm(Algorithm::Rs512);
        assert_eq!(
            header.to_json().unwrap(),
            r#"{"typ":"JWT","kid":"k1","alg":"RS512"}"#
        );
    }

    #[test]
    fn header_rejects_non_objects() {
        assert!(matches!(
            Header::from_json_str("[1,2]"),
            Err(JwtError::InvalidHeaderJson { .. })
        ));
        assert!(matches!(
            Header::from_json_str("{"),
            Err(JwtError::InvalidHeaderJson { .. })
        ));
    }

    #[test]
    fn header_algorithm_lookup() {
        let header = Header::from_map(Map::new());
        assert_eq!(header.algorithm(), Err(JwtError::MissingAlgorithm));

        let header = Header::from_json_str(r#"{"alg":"none"}"#).unwrap();
        assert!(matches!(
            header.algorithm(),
            Err(JwtError::UnsupportedAlgorithm { .. })
        ));

        assert_eq!(Header::new(Algorithm::Es384).algorithm(), Ok(Algorithm::Es384));
    }

    #[test]
    fn payload_from_bytes_keeps_non_json_text() {
        assert_eq!(Payload::from_bytes(br#"{"a":1}"#), Payload::Json(json!({"a": 1})));
        assert_eq!(Payload::from_bytes(b"hello"), Payload::Raw("hello".to_string()));
        assert_eq!(Payload::from_bytes(b"42"), Payload::Json(json!(42)));
    }

    #[test]
    fn large_numbers_keep_their_digits() {
        let text = r#"{"id":123456789012345678901234567890,"ratio":0.1000000000000000055511151231257827}"#;
        let payload = Payload::from_json_str(text).unwrap();
        assert_eq!(payload.to_segment_bytes().unwrap(), text.as_bytes());
        assert_eq!(Payload::from_bytes(text.as_bytes()), payload);

        let header = Header::from_json_str(r#"{"alg":"HS256","ver":18446744073709551616}"#).unwrap();
        assert_eq!(
            header.to_json().unwrap(),
            r#"{"alg":"HS256","ver":18446744073709551616}"#
        );
    }

    #[test]
    fn raw_payload_passes_through_unchanged() {
        let raw = Payload::Raw("not { json".to_string());
        assert_eq!(raw.to_segment_bytes().unwrap(), b"not { json");
        assert!(raw.as_object().is_none());
    }

    #[test]
    fn material_debug_hides_secrets() {
        let secret = SignatureMaterial::secret("hunter2");
        let pair = SignatureMaterial::key_pair("PUBLIC", "PRIVATE-BITS");
        assert!(!format!("{secret:?}").contains("hunter2"));
        let shown = format!("{pair:?}");
        assert!(shown.contains("PUBLIC"));
        assert!(!shown.contains("PRIVATE-BITS"));
    }

    #[test]
    fn material_fits_family() {
        assert!(SignatureMaterial::secret("s").fits(AlgorithmFamily::Hmac));
        assert!(!SignatureMaterial::secret("s").fits(AlgorithmFamily::Rsa));
        assert!(SignatureMaterial::key_pair("a", "b").fits(AlgorithmFamily::Ecdsa));
        assert!(!SignatureMaterial::key_pair("a", "b").fits(AlgorithmFamily::Hmac));
    }

    #[test]
    fn pinned_options_reject_other_algorithms() {
        let options = VerifyOptions::pinned([Algorithm::Rs256]);
        assert!(options.check(Algorithm::Rs256).is_ok());
        assert_eq!(
            options.check(Algorithm::Hs256),
            Err(JwtError::AlgorithmNotAllowed {
                alg: "HS256".to_string()
            })
        );
        assert!(VerifyOptions::trust_header().check(Algorithm::Hs256).is_ok());
    }

    #[test]
    fn warning_messages_link_the_rfcs() {
        assert!(DecodeWarning::PayloadInvalidJson.message().contains("rfc7519#section-7.2"));
        assert!(DecodeWarning::SignatureBase64Invalid
            .message()
            .starts_with("Looks like your JWT signature"));
    }
}
