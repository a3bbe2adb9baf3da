//! Token signing

use crate::{
    algorithms::Algorithm,
    codec, crypto,
    error::{JwtError, JwtResult},
    futures::{spawn_with, AsyncJwtResult},
    keys::{self, ResolvedKey},
    types::{Header, KeyRole, Payload, SignatureMaterial},
};
use tracing::debug;

/// Sign `payload` under `header`, resolving the private key or secret from `material`.
///
/// The algorithm is taken from the header's `alg` member.
pub fn sign_compact(
    header: &Header,
    payload: &Payload,
    material: &SignatureMaterial,
) -> JwtResult<String> {
    let alg_name = header.alg().ok_or(JwtError::MissingAlgorithm)?;
    let (alg, key) = keys::resolve_named_key(alg_name, material, KeyRole::Signing)?;
    sign_with_key(header, payload, alg, &key)
}

/// Sign with an already resolved key.
pub fn sign_with_key(
    header: &Header,
    payload: &Payload,
    alg: Algorithm,
    key: &ResolvedKey,
) -> JwtResult<String> {
    let input = signing_input(header, payload)?;
    let signature = crypto::sign(alg, key, input.as_bytes())?;
    debug!(%alg, signature_len = signature.len(), "signed token");

    Ok(format!("{input}.{}", codec::encode(&signature)))
}

/// `base64url(header) "." base64url(payload)`, the bytes a signature covers.
pub(crate) fn signing_input(header: &Header, payload: &Payload) -> JwtResult<String> {
    let header_segment = codec::encode(header.to_json()?.as_bytes());
    let payload_segment = codec::encode(&payload.to_segment_bytes()?);
    Ok(format!("{header_segment}.{payload_segment}"))
}

/// Sign on the blocking pool.
#[must_use]
pub fn sign(header: Header, payload: Payload, material: SignatureMaterial) -> AsyncJwtResult<String> {
    spawn_with(
        move || sign_compact(&header, &payload, &material),
        AsyncJwtResult::new,
    )
}
