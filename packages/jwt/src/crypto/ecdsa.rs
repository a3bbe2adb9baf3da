//! ECDSA over P-256, P-384 and P-521
//!
//! Signatures are the fixed-size `r || s` concatenation JWS uses, not DER.

use crate::{
    error::{JwtError, JwtResult},
    keys::{EcSigningKey, EcVerifyingKey},
};
use p256::ecdsa::signature::{Signer, Verifier};

/// Sign `message` with the key's curve and matching hash.
pub(crate) fn sign(key: &EcSigningKey, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signature = match key {
        EcSigningKey::P256(key) => {
            Signer::<p256::ecdsa::Signature>::try_sign(key, message).map(|s| s.to_bytes().to_vec())
        }
        EcSigningKey::P384(key) => {
            Signer::<p384::ecdsa::Signature>::try_sign(key, message).map(|s| s.to_bytes().to_vec())
        }
        EcSigningKey::P521(key) => {
            Signer::<p521::ecdsa::Signature>::try_sign(key, message).map(|s| s.to_bytes().to_vec())
        }
    };
    signature.map_err(|e| JwtError::Signing(e.to_string()))
}

/// Verify a raw `r || s` signature.
pub(crate) fn verify(key: &EcVerifyingKey, message: &[u8], signature: &[u8]) -> bool {
    if signature.len() != key.curve().signature_size() {
        return false;
    }
    match key {
        EcVerifyingKey::P256(key) => p256::ecdsa::Signature::from_slice(signature)
            .is_ok_and(|signature| key.verify(message, &signature).is_ok()),
        EcVerifyingKey::P384(key) => p384::ecdsa::Signature::from_slice(signature)
            .is_ok_and(|signature| key.verify(message, &signature).is_ok()),
        EcVerifyingKey::P521(key) => p521::ecdsa::Signature::from_slice(signature)
            .is_ok_and(|signature| key.verify(message, &signature).is_ok()),
    }
}
