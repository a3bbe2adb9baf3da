//! Editor configuration

use super::samples;
use crate::{
    algorithms::{Algorithm, EcCurve},
    error::JwtResult,
    types::{SignatureMaterial, VerifyOptions},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// PEM text of a key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPairPem {
    /// Public key, certificate or JWK text
    pub public_key: String,
    /// Private key or JWK text
    pub private_key: String,
}

impl KeyPairPem {
    fn new(public_key: &str, private_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
        }
    }

    pub(crate) fn to_material(&self) -> SignatureMaterial {
        SignatureMaterial::key_pair(self.public_key.as_str(), self.private_key.as_str())
    }
}

impl fmt::Debug for KeyPairPem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPairPem")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Starting token and per-family key material for a [`JwtEditor`](super::JwtEditor).
///
/// Every field has a default, so a partial JSON document is enough.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Token shown when the editor opens
    pub initial_token: String,
    /// HMAC secret for `HS*`
    pub secret: String,
    /// Whether `secret` is base64 text
    pub secret_base64_encoded: bool,
    /// Key pair for `RS*` and `PS*`
    pub rsa: KeyPairPem,
    /// Key pair for `ES256`
    pub ec_p256: KeyPairPem,
    /// Key pair for `ES384`
    pub ec_p384: KeyPairPem,
    /// Key pair for `ES512`
    pub ec_p521: KeyPairPem,
    /// Restrict verification to these algorithms instead of trusting the header
    pub pinned_algorithms: Option<Vec<Algorithm>>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_token: samples::DEFAULT_TOKEN.to_string(),
            secret: samples::DEFAULT_SECRET.to_string(),
            secret_base64_encoded: false,
            rsa: KeyPairPem::new(samples::RSA_PUBLIC_KEY, samples::RSA_PRIVATE_KEY),
            ec_p256: KeyPairPem::new(samples::EC_P256_PUBLIC_KEY, samples::EC_P256_PRIVATE_KEY),
            ec_p384: KeyPairPem::new(samples::EC_P384_PUBLIC_KEY, samples::EC_P384_PRIVATE_KEY),
            ec_p521: KeyPairPem::new(samples::EC_P521_PUBLIC_KEY, samples::EC_P521_PRIVATE_KEY),
            pinned_algorithms: None,
        }
    }
}

impl fmt::Debug for EditorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorConfig")
            .field("initial_token", &self.initial_token)
            .field("secret", &"<redacted>")
            .field("secret_base64_encoded", &self.secret_base64_encoded)
            .field("rsa", &self.rsa)
            .field("ec_p256", &self.ec_p256)
            .field("ec_p384", &self.ec_p384)
            .field("ec_p521", &self.ec_p521)
            .field("pinned_algorithms", &self.pinned_algorithms)
            .finish()
    }
}

impl EditorConfig {
    /// Parse a JSON configuration document.
    pub fn from_json_str(text: &str) -> JwtResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Verification policy implied by `pinned_algorithms`.
    #[must_use]
    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            allowed_algorithms: self.pinned_algorithms.clone(),
        }
    }

    pub(crate) fn secret_material(&self) -> SignatureMaterial {
        SignatureMaterial::Symmetric {
            key: self.secret.clone(),
            base64_encoded: self.secret_base64_encoded,
        }
    }

    pub(crate) fn ec_key_pair(&self, curve: EcCurve) -> &KeyPairPem {
        match curve {
            EcCurve::P256 => &self.ec_p256,
            EcCurve::P384 => &self.ec_p384,
            EcCurve::P521 => &self.ec_p521,
        }
    }
}
