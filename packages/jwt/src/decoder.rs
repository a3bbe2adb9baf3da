//! Lenient token decoding
//!
//! Decoding never fails for a token that has the right shape: damaged
//! segments are decoded as far as possible and reported as warnings so the
//! user can keep editing. Only a wrong segment count or a header that is not
//! a JSON object set `errors`.

use crate::{
    codec,
    error::{JwtError, JwtResult},
    types::{DecodeResult, DecodeWarning, Header, Payload},
};
use serde_json::Value;
use tracing::debug;

/// Split a compact token into its three segments.
pub(crate) fn split_segments(token: &str) -> JwtResult<[&str; 3]> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [header, payload, signature] => Ok([*header, *payload, *signature]),
        [_, _, _, _, _] => Err(JwtError::malformed(
            "encrypted tokens (JWE, five segments) are not supported",
        )),
        other => Err(JwtError::malformed(format!(
            "expected 3 segments, found {}",
            other.len()
        ))),
    }
}

/// Decode a compact token for display.
#[must_use]
pub fn decode(token: &str) -> DecodeResult {
    if token.is_empty() {
        return DecodeResult::failed();
    }

    let [header_segment, payload_segment, signature_segment] = match split_segments(token) {
        Ok(segments) => segments,
        Err(err) => {
            debug!(error = %err, "token cannot be split");
            return DecodeResult::failed();
        }
    };

    let mut warnings = Vec::new();
    for (segment, warning) in [
        (header_segment, DecodeWarning::HeaderBase64Invalid),
        (payload_segment, DecodeWarning::PayloadBase64Invalid),
        (signature_segment, DecodeWarning::SignatureBase64Invalid),
    ] {
        if !codec::is_valid(segment, false) {
            warnings.push(warning);
        }
    }

    let header = match serde_json::from_slice::<Value>(&codec::decode_lossy(header_segment)) {
        Ok(Value::Object(map)) => Header::from_map(map),
        Ok(_) | Err(_) => {
            debug!("token header is not a JSON object");
            return DecodeResult {
                warnings,
                ..DecodeResult::failed()
            };
        }
    };

    let payload = Payload::from_bytes(&codec::decode_lossy(payload_segment));
    if payload.as_object().is_none() {
        warnings.push(DecodeWarning::PayloadInvalidJson);
    }

    if !warnings.is_empty() {
        debug!(count = warnings.len(), "token decoded with warnings");
    }

    DecodeResult {
        header: Some(header),
        payload,
        errors: false,
        warnings,
    }
}

/// Quick check whether text looks like a compact JWT.
///
/// With `check_typ`, the header must also carry `typ: "JWT"`.
#[must_use]
pub fn is_token(token: &str, check_typ: bool) -> bool {
    let decoded = decode(token);
    if decoded.errors {
        return false;
    }
    if check_typ && decoded.header.as_ref().and_then(Header::typ) != Some("JWT") {
        return false;
    }
    token.split('.').all(|segment| codec::is_valid(segment, true))
}
