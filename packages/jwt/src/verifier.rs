//! Token verification
//!
//! The signature is checked over the first two segments exactly as they
//! appear in the token, never over a re-encoding of the decoded JSON.
//! Every failure (wrong shape, unknown algorithm, unusable key, bad
//! signature) collapses into `valid_signature == false`.

use crate::{
    algorithms::Algorithm,
    codec, crypto,
    decoder::{self, split_segments},
    error::{JwtError, JwtResult},
    futures::{spawn_with, VerifyFuture},
    keys,
    types::{Header, KeyRole, Payload, SignatureMaterial, VerifyOptions, VerifyResult},
};
use tracing::debug;

/// Verify `token` against `material`.
#[must_use]
pub fn verify_compact(
    token: &str,
    material: &SignatureMaterial,
    options: &VerifyOptions,
) -> VerifyResult {
    let valid_base64 = token.split('.').all(|segment| codec::is_valid(segment, false));
    let invalid = || VerifyResult::invalid(valid_base64);

    if !decoder::is_token(token, false) {
        debug!("verification skipped: not a compact JWT");
        return invalid();
    }
    let decoded = decoder::decode(token);
    let Some(header) = decoded.header else {
        return invalid();
    };
    let alg = match admit(&header, options) {
        Ok(alg) => alg,
        Err(err) => {
            debug!(error = %err, "verification failed");
            return invalid();
        }
    };
    let key = match keys::resolve_key(alg, material, KeyRole::Verification) {
        Ok(key) => key,
        Err(err) => {
            debug!(error = %err, "verification failed: no usable key");
            return invalid();
        }
    };

    let Ok([header_segment, payload_segment, signature_segment]) = split_segments(token) else {
        return invalid();
    };
    let signature = match codec::decode_segment(signature_segment, "signature") {
        Ok(signature) => signature,
        Err(err) => {
            debug!(error = %err, "verification failed");
            return invalid();
        }
    };

    let signing_input = &token[..header_segment.len() + 1 + payload_segment.len()];
    if !crypto::verify(alg, &key, signing_input.as_bytes(), &signature) {
        debug!(%alg, "signature mismatch");
        return invalid();
    }

    debug!(%alg, "signature verified");
    VerifyResult {
        valid_signature: true,
        valid_base64,
        verified_header: Some(header),
        verified_payload: Some(Payload::from_bytes(&codec::decode_lossy(payload_segment))),
    }
}

/// The algorithm a header names, if it is supported and allowed by `options`.
pub(crate) fn admit(header: &Header, options: &VerifyOptions) -> JwtResult<Algorithm> {
    let alg: Algorithm = header.alg().ok_or(JwtError::MissingAlgorithm)?.parse()?;
    options.check(alg)?;
    Ok(alg)
}

/// Verify on the blocking pool.
#[must_use]
pub fn verify(token: String, material: SignatureMaterial, options: VerifyOptions) -> VerifyFuture {
    spawn_with(
        move || verify_compact(&token, &material, &options),
        VerifyFuture::new,
    )
}
