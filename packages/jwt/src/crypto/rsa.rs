//! RSASSA-PKCS1-v1_5 and RSASSA-PSS
//!
//! PSS signatures use MGF1 with the same hash and a salt as long as the hash
//! output, which is what RFC 7518 requires for `PS*`.

use crate::{
    algorithms::Algorithm,
    error::{JwtError, JwtResult},
};
use rsa::{
    pkcs1v15, pss,
    rand_core::OsRng,
    signature::{RandomizedSigner, SignatureEncoding, Signer, Verifier},
    RsaPrivateKey, RsaPublicKey,
};
use sha2::{Sha256, Sha384, Sha512};

macro_rules! pkcs1v15_sign {
    ($digest:ty, $key:expr, $message:expr) => {
        pkcs1v15::SigningKey::<$digest>::new($key.clone())
            .try_sign($message)
            .map(|signature| signature.to_vec())
    };
}

macro_rules! pkcs1v15_verify {
    ($digest:ty, $key:expr, $message:expr, $signature:expr) => {
        pkcs1v15::Signature::try_from($signature).is_ok_and(|signature| {
            pkcs1v15::VerifyingKey::<$digest>::new($key.clone())
                .verify($message, &signature)
                .is_ok()
        })
    };
}

macro_rules! pss_sign {
    ($digest:ty, $key:expr, $message:expr) => {
        pss::BlindedSigningKey::<$digest>::new($key.clone())
            .try_sign_with_rng(&mut OsRng, $message)
            .map(|signature| signature.to_vec())
    };
}

macro_rules! pss_verify {
    ($digest:ty, $key:expr, $message:expr, $signature:expr) => {
        pss::Signature::try_from($signature).is_ok_and(|signature| {
            pss::VerifyingKey::<$digest>::new($key.clone())
                .verify($message, &signature)
                .is_ok()
        })
    };
}

/// Sign with `RS*` or `PS*`.
pub(crate) fn sign(alg: Algorithm, key: &RsaPrivateKey, message: &[u8]) -> JwtResult<Vec<u8>> {
    let signature = match alg {
        Algorithm::Rs256 => pkcs1v15_sign!(Sha256, key, message),
        Algorithm::Rs384 => pkcs1v15_sign!(Sha384, key, message),
        Algorithm::Rs512 => pkcs1v15_sign!(Sha512, key, message),
        Algorithm::Ps256 => pss_sign!(Sha256, key, message),
        Algorithm::Ps384 => pss_sign!(Sha384, key, message),
        Algorithm::Ps512 => pss_sign!(Sha512, key, message),
        _ => return Err(JwtError::material_mismatch(alg.as_str())),
    };
    signature.map_err(|e| JwtError::Signing(e.to_string()))
}

/// Verify an `RS*` or `PS*` signature.
pub(crate) fn verify(alg: Algorithm, key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> bool {
    match alg {
        Algorithm::Rs256 => pkcs1v15_verify!(Sha256, key, message, signature),
        Algorithm::Rs384 => pkcs1v15_verify!(Sha384, key, message, signature),
        Algorithm::Rs512 => pkcs1v15_verify!(Sha512, key, message, signature),
        Algorithm::Ps256 => pss_verify!(Sha256, key, message, signature),
        Algorithm::Ps384 => pss_verify!(Sha384, key, message, signature),
        Algorithm::Ps512 => pss_verify!(Sha512, key, message, signature),
        _ => false,
    }
}
