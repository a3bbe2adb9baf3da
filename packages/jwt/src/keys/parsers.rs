//! Candidate key formats, tried in order

use super::{
    ec::{EcSigningKey, EcVerifyingKey},
    jwk, ResolvedKey,
};
use crate::{
    algorithms::{Algorithm, AlgorithmFamily},
    types::KeyRole,
};
use rsa::{
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    RsaPrivateKey, RsaPublicKey,
};
use x509_cert::{
    der::{DecodePem, Encode},
    Certificate,
};

/// One way of reading asymmetric key text.
pub(crate) trait KeyParser: Sync {
    /// Short name used in logs and error reasons
    fn name(&self) -> &'static str;

    /// Whether this format can carry a key for `role`
    fn supports(&self, _role: KeyRole) -> bool {
        true
    }

    /// Parse `input` as a key for `alg`
    fn parse(&self, alg: Algorithm, input: &str, role: KeyRole) -> Result<ResolvedKey, String>;
}

/// PKCS#8 private keys and SPKI public keys in PEM armour.
pub(crate) struct StandardPem;

/// Public key taken from an X.509 certificate.
pub(crate) struct X509Certificate;

/// JSON Web Key.
pub(crate) struct JsonWebKey;

pub(crate) static PARSERS: [&dyn KeyParser; 3] = [&StandardPem, &X509Certificate, &JsonWebKey];

impl KeyParser for StandardPem {
    fn name(&self) -> &'static str {
        "pem"
    }

    fn parse(&self, alg: Algorithm, input: &str, role: KeyRole) -> Result<ResolvedKey, String> {
        match (alg.family(), role, alg.curve()) {
            (AlgorithmFamily::Rsa | AlgorithmFamily::RsaPss, KeyRole::Signing, _) => {
                RsaPrivateKey::from_pkcs8_pem(input)
                    .map(|key| ResolvedKey::RsaPrivate(Box::new(key)))
                    .map_err(|e| e.to_string())
            }
            (AlgorithmFamily::Rsa | AlgorithmFamily::RsaPss, KeyRole::Verification, _) => {
                RsaPublicKey::from_public_key_pem(input)
                    .map(|key| ResolvedKey::RsaPublic(Box::new(key)))
                    .map_err(|e| e.to_string())
            }
            (AlgorithmFamily::Ecdsa, KeyRole::Signing, Some(curve)) => {
                EcSigningKey::from_pkcs8_pem(curve, input).map(ResolvedKey::EcPrivate)
            }
            (AlgorithmFamily::Ecdsa, KeyRole::Verification, Some(curve)) => {
                EcVerifyingKey::from_spki_pem(curve, input).map(ResolvedKey::EcPublic)
            }
            _ => Err(format!("{alg} does not use PEM keys")),
        }
    }
}

impl KeyParser for X509Certificate {
    fn name(&self) -> &'static str {
        "x509"
    }

    fn supports(&self, role: KeyRole) -> bool {
        role == KeyRole::Verification
    }

    fn parse(&self, alg: Algorithm, input: &str, _role: KeyRole) -> Result<ResolvedKey, String> {
        let certificate = Certificate::from_pem(input).map_err(|e| e.to_string())?;
        let spki = certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| e.to_string())?;
        match (alg.family(), alg.curve()) {
            (AlgorithmFamily::Rsa | AlgorithmFamily::RsaPss, _) => {
                RsaPublicKey::from_public_key_der(&spki)
                    .map(|key| ResolvedKey::RsaPublic(Box::new(key)))
                    .map_err(|e| e.to_string())
            }
            (AlgorithmFamily::Ecdsa, Some(curve)) => {
                EcVerifyingKey::from_spki_der(curve, &spki).map(ResolvedKey::EcPublic)
            }
            _ => Err(format!("{alg} does not use certificates")),
        }
    }
}

impl KeyParser for JsonWebKey {
    fn name(&self) -> &'static str {
        "jwk"
    }

    fn parse(&self, alg: Algorithm, input: &str, role: KeyRole) -> Result<ResolvedKey, String> {
        jwk::import(alg, input, role)
    }
}
