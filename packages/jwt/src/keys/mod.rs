//! Key resolution
//!
//! Turns user-entered [`SignatureMaterial`] into a key object for one
//! algorithm and one role. HMAC secrets are used as entered. Asymmetric text
//! is tried against each supported format in turn:
//!
//! 1. PKCS#1 `RSA PRIVATE KEY` / `RSA PUBLIC KEY`, rewritten as PKCS#8 / SPKI
//! 2. PKCS#8 private key or SPKI public key PEM
//! 3. X.509 certificate (verification only)
//! 4. JSON Web Key
//!
//! The first format that parses wins.

mod ec;
mod jwk;
mod legacy;
mod parsers;

pub use ec::{EcSigningKey, EcVerifyingKey};

use crate::{
    algorithms::{Algorithm, AlgorithmFamily},
    codec,
    error::{JwtError, JwtResult},
    types::{KeyRole, SignatureMaterial},
};
use devbelt_common::fingerprint;
use rsa::{traits::PublicKeyParts, RsaPrivateKey, RsaPublicKey};
use std::fmt;
use tracing::debug;
use zeroize::Zeroizing;

/// A key ready for signing or verification.
pub enum ResolvedKey {
    /// HMAC secret bytes
    Hmac(Zeroizing<Vec<u8>>),
    /// RSA private key, used by `RS*` and `PS*`
    RsaPrivate(Box<RsaPrivateKey>),
    /// RSA public key, used by `RS*` and `PS*`
    RsaPublic(Box<RsaPublicKey>),
    /// ECDSA private key
    EcPrivate(EcSigningKey),
    /// ECDSA public key
    EcPublic(EcVerifyingKey),
}

impl fmt::Debug for ResolvedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedKey::Hmac(secret) => write!(f, "Hmac({} bytes)", secret.len()),
            ResolvedKey::RsaPrivate(key) => write!(f, "RsaPrivate({} bits)", key.size() * 8),
            ResolvedKey::RsaPublic(key) => write!(f, "RsaPublic({} bits)", key.size() * 8),
            ResolvedKey::EcPrivate(key) => write!(f, "EcPrivate({})", key.curve()),
            ResolvedKey::EcPublic(key) => write!(f, "EcPublic({})", key.curve()),
        }
    }
}

/// Resolve the key for `alg` from `material`.
pub fn resolve_key(
    alg: Algorithm,
    material: &SignatureMaterial,
    role: KeyRole,
) -> JwtResult<ResolvedKey> {
    match (alg.family(), material) {
        (
            AlgorithmFamily::Hmac,
            SignatureMaterial::Symmetric {
                key,
                base64_encoded,
            },
        ) => hmac_secret(alg, key, *base64_encoded, role).map(ResolvedKey::Hmac),
        (AlgorithmFamily::Hmac, SignatureMaterial::Asymmetric { .. })
        | (_, SignatureMaterial::Symmetric { .. }) => Err(JwtError::material_mismatch(alg.as_str())),
        (
            _,
            SignatureMaterial::Asymmetric {
                public_key,
                private_key,
            },
        ) => {
            let text = match role {
                KeyRole::Signing => private_key,
                KeyRole::Verification => public_key,
            };
            resolve_asymmetric(alg, text, role)
        }
    }
}

/// Resolve a key for an `alg` header value that may not name a supported algorithm.
pub fn resolve_named_key(
    alg: &str,
    material: &SignatureMaterial,
    role: KeyRole,
) -> JwtResult<(Algorithm, ResolvedKey)> {
    let algorithm: Algorithm = alg
        .parse()
        .map_err(|_| JwtError::key_resolution(alg, role, "unsupported algorithm"))?;
    resolve_key(algorithm, material, role).map(|key| (algorithm, key))
}

fn hmac_secret(
    alg: Algorithm,
    key: &str,
    base64_encoded: bool,
    role: KeyRole,
) -> JwtResult<Zeroizing<Vec<u8>>> {
    let secret = if base64_encoded {
        codec::decode_secret(key).map_err(|e| {
            JwtError::key_resolution(alg.as_str(), role, format!("secret is not base64: {e}"))
        })?
    } else {
        Zeroizing::new(key.as_bytes().to_vec())
    };
    debug!(%alg, %role, secret = %fingerprint(&secret), len = secret.len(), "resolved HMAC secret");
    Ok(secret)
}

fn resolve_asymmetric(alg: Algorithm, text: &str, role: KeyRole) -> JwtResult<ResolvedKey> {
    let input = legacy::normalize(text, role);
    if input.is_empty() {
        return Err(JwtError::key_resolution(alg.as_str(), role, "no key supplied"));
    }

    let mut failures = Vec::new();
    for parser in parsers::PARSERS.iter().filter(|p| p.supports(role)) {
        match parser.parse(alg, &input, role) {
            Ok(key) => {
                debug!(
                    %alg,
                    %role,
                    format = parser.name(),
                    key = %fingerprint(input.as_bytes()),
                    "resolved asymmetric key"
                );
                return Ok(key);
            }
            Err(reason) => failures.push(format!("{}: {reason}", parser.name())),
        }
    }

    Err(JwtError::key_resolution(alg.as_str(), role, failures.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::samples;

    #[test]
    fn hmac_secret_is_used_as_entered() {
        let key = resolve_key(
            Algorithm::Hs512,
            &SignatureMaterial::secret("short"),
            KeyRole::Signing,
        )
        .unwrap();
        match key {
            ResolvedKey::Hmac(secret) => assert_eq!(secret.as_slice(), b"short"),
            other => panic!("unexpected key {other:?}"),
        }
    }

    #[test]
    fn base64_secret_is_decoded() {
        let material = SignatureMaterial::Symmetric {
            key: "c2VjcmV0".to_string(),
            base64_encoded: true,
        };
        match resolve_key(Algorithm::Hs256, &material, KeyRole::Verification).unwrap() {
            ResolvedKey::Hmac(secret) => assert_eq!(secret.as_slice(), b"secret"),
            other => panic!("unexpected key {other:?}"),
        }

        let broken = SignatureMaterial::Symmetric {
            key: "***".to_string(),
            base64_encoded: true,
        };
        assert!(matches!(
            resolve_key(Algorithm::Hs256, &broken, KeyRole::Verification),
            Err(JwtError::KeyResolution { .. })
        ));
    }

    #[test]
    fn material_must_fit_the_family() {
        let err = resolve_key(
            Algorithm::Rs256,
            &SignatureMaterial::secret("s"),
            KeyRole::Signing,
        )
        .unwrap_err();
        assert_eq!(err, JwtError::material_mismatch("RS256"));

        let err = resolve_key(
            Algorithm::Hs256,
            &SignatureMaterial::key_pair("a", "b"),
            KeyRole::Signing,
        )
        .unwrap_err();
        assert_eq!(err, JwtError::material_mismatch("HS256"));
    }

    #[test]
    fn resolves_sample_pem_keys_for_each_role() {
        let rsa = SignatureMaterial::key_pair(samples::RSA_PUBLIC_KEY, samples::RSA_PRIVATE_KEY);
        assert!(matches!(
            resolve_key(Algorithm::Ps384, &rsa, KeyRole::Signing),
            Ok(ResolvedKey::RsaPrivate(_))
        ));
        assert!(matches!(
            resolve_key(Algorithm::Rs256, &rsa, KeyRole::Verification),
            Ok(ResolvedKey::RsaPublic(_))
        ));

        let ec = SignatureMaterial::key_pair(samples::EC_P384_PUBLIC_KEY, samples::EC_P384_PRIVATE_KEY);
        assert!(matches!(
            resolve_key(Algorithm::Es384, &ec, KeyRole::Signing),
            Ok(ResolvedKey::EcPrivate(EcSigningKey::P384(_)))
        ));
        assert!(matches!(
            resolve_key(Algorithm::Es384, &ec, KeyRole::Verification),
            Ok(ResolvedKey::EcPublic(EcVerifyingKey::P384(_)))
        ));
    }

    #[test]
    fn wrong_curve_fails_with_role_and_algorithm() {
        let ec = SignatureMaterial::key_pair(samples::EC_P256_PUBLIC_KEY, samples::EC_P256_PRIVATE_KEY);
        match resolve_key(Algorithm::Es512, &ec, KeyRole::Verification) {
            Err(JwtError::KeyResolution { alg, role, reason }) => {
                assert_eq!(alg, "ES512");
                assert_eq!(role, KeyRole::Verification);
                assert!(reason.contains("pem:"));
                assert!(reason.contains("jwk:"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn certificates_are_not_tried_for_signing() {
        let cert = include_str!("../../tests/fixtures/rsa_certificate.pem");
        let material = SignatureMaterial::key_pair(cert, cert);
        match resolve_key(Algorithm::Rs256, &material, KeyRole::Signing) {
            Err(JwtError::KeyResolution { reason, .. }) => assert!(!reason.contains("x509")),
            other => panic!("unexpected result {other:?}"),
        }
        assert!(matches!(
            resolve_key(Algorithm::Rs256, &material, KeyRole::Verification),
            Ok(ResolvedKey::RsaPublic(_))
        ));
    }

    #[test]
    fn unknown_algorithm_is_a_resolution_failure() {
        let err = resolve_named_key("none", &SignatureMaterial::secret("s"), KeyRole::Verification)
            .unwrap_err();
        assert_eq!(
            err,
            JwtError::key_resolution("none", KeyRole::Verification, "unsupported algorithm")
        );
    }

    #[test]
    fn empty_key_text_is_rejected() {
        let material = SignatureMaterial::key_pair("  ", "");
        assert!(matches!(
            resolve_key(Algorithm::Es256, &material, KeyRole::Signing),
            Err(JwtError::KeyResolution { .. })
        ));
    }
}
