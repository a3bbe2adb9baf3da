//! Base64URL codec
//!
//! Encoding always uses the URL-safe alphabet without padding. Decoding comes
//! in two flavours: [`decode`] is strict and reports errors, [`decode_lossy`]
//! never fails and is what the token decoder uses so that a damaged segment
//! still yields as much content as can be recovered.

use crate::error::{JwtError, JwtResult};
use base64::{
    alphabet,
    engine::{
        general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD},
        DecodePaddingMode,
    },
    Engine as _,
};
use zeroize::Zeroizing;

const URL_SAFE_LOSSY: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

const STANDARD_ANY_PADDING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

const URL_SAFE_ANY_PADDING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as unpadded base64url.
#[must_use]
pub fn encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Strictly decode base64url.
///
/// Trailing `=` padding is tolerated; any other character outside the
/// URL-safe alphabet is an error.
pub fn decode(input: &str) -> JwtResult<Vec<u8>> {
    decode_segment(input, "base64url value")
}

pub(crate) fn decode_segment(input: &str, segment: &str) -> JwtResult<Vec<u8>> {
    let unpadded = input.trim_end_matches('=');
    let invalid = || JwtError::InvalidEncoding {
        segment: segment.to_string(),
    };
    if input.len() - unpadded.len() > 2 || !is_valid(unpadded, false) {
        return Err(invalid());
    }
    URL_SAFE_NO_PAD.decode(unpadded).map_err(|_| invalid())
}

/// Decode base64url without ever failing.
///
/// Characters outside the alphabet are skipped, `+` and `/` are read as their
/// URL-safe counterparts, `=` is ignored and a dangling final character that
/// cannot form a byte is dropped.
#[must_use]
pub fn decode_lossy(input: &str) -> Vec<u8> {
    let mut cleaned: String = input
        .chars()
        .filter_map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' => Some(c),
            '+' => Some('-'),
            '/' => Some('_'),
            _ => None,
        })
        .collect();
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    URL_SAFE_LOSSY.decode(&cleaned).unwrap_or_default()
}

/// Whether every character of `input` belongs to the base64url alphabet,
/// optionally allowing `=`.
#[must_use]
pub fn is_valid(input: &str, allow_padding: bool) -> bool {
    input
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || (allow_padding && b == b'='))
}

/// Decode a base64-encoded HMAC secret.
///
/// Users paste secrets in either alphabet, padded or not.
pub(crate) fn decode_secret(input: &str) -> Result<Zeroizing<Vec<u8>>, base64::DecodeError> {
    let compact = Zeroizing::new(input.split_whitespace().collect::<String>());
    STANDARD_ANY_PADDING
        .decode(compact.as_bytes())
        .or_else(|_| URL_SAFE_ANY_PADDING.decode(compact.as_bytes()))
        .map(Zeroizing::new)
}
