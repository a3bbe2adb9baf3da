//! Signature primitives, dispatched on algorithm and resolved key

mod ecdsa;
mod hmac;
mod rsa;

use crate::{
    algorithms::Algorithm,
    error::{JwtError, JwtResult},
    keys::ResolvedKey,
};

/// Produce the raw signature bytes over `message`.
pub(crate) fn sign(alg: Algorithm, key: &ResolvedKey, message: &[u8]) -> JwtResult<Vec<u8>> {
    match key {
        ResolvedKey::Hmac(secret) => hmac::sign(alg, secret, message),
        ResolvedKey::RsaPrivate(key) => rsa::sign(alg, key, message),
        ResolvedKey::EcPrivate(key) if alg.curve() == Some(key.curve()) => ecdsa::sign(key, message),
        ResolvedKey::EcPrivate(_) | ResolvedKey::RsaPublic(_) | ResolvedKey::EcPublic(_) => {
            Err(JwtError::material_mismatch(alg.as_str()))
        }
    }
}

/// Check raw signature bytes over `message`. Any mismatch is simply `false`.
pub(crate) fn verify(alg: Algorithm, key: &ResolvedKey, message: &[u8], signature: &[u8]) -> bool {
    match key {
        ResolvedKey::Hmac(secret) => hmac::verify(alg, secret, message, signature),
        ResolvedKey::RsaPublic(key) => rsa::verify(alg, key, message, signature),
        ResolvedKey::EcPublic(key) if alg.curve() == Some(key.curve()) => {
            ecdsa::verify(key, message, signature)
        }
        ResolvedKey::EcPublic(_) | ResolvedKey::RsaPrivate(_) | ResolvedKey::EcPrivate(_) => false,
    }
}
