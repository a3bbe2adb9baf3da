//! Supported JWS algorithms and their families

use crate::error::JwtError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// One of the twelve supported JWS signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    /// HMAC using SHA-256
    Hs256,
    /// HMAC using SHA-384
    Hs384,
    /// HMAC using SHA-512
    Hs512,
    /// RSASSA-PKCS1-v1_5 using SHA-256
    Rs256,
    /// RSASSA-PKCS1-v1_5 using SHA-384
    Rs384,
    /// RSASSA-PKCS1-v1_5 using SHA-512
    Rs512,
    /// ECDSA using P-256 and SHA-256
    Es256,
    /// ECDSA using P-384 and SHA-384
    Es384,
    /// ECDSA using P-521 and SHA-512
    Es512,
    /// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
    Ps256,
    /// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
    Ps384,
    /// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
    Ps512,
}

/// Algorithm family. Families share one slot of signature material in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// `HS*`
    Hmac,
    /// `RS*`
    Rsa,
    /// `ES*`
    Ecdsa,
    /// `PS*`
    RsaPss,
}

/// Named curve used by an ECDSA algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256
    P256,
    /// NIST P-384
    P384,
    /// NIST P-521
    P521,
}

impl Algorithm {
    /// Every supported algorithm in display order.
    pub const ALL: [Algorithm; 12] = [
        Algorithm::Hs256,
        Algorithm::Hs384,
        Algorithm::Hs512,
        Algorithm::Rs256,
        Algorithm::Rs384,
        Algorithm::Rs512,
        Algorithm::Es256,
        Algorithm::Es384,
        Algorithm::Es512,
        Algorithm::Ps256,
        Algorithm::Ps384,
        Algorithm::Ps512,
    ];

    /// The `alg` header value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Hs256 => "HS256",
            Algorithm::Hs384 => "HS384",
            Algorithm::Hs512 => "HS512",
            Algorithm::Rs256 => "RS256",
            Algorithm::Rs384 => "RS384",
            Algorithm::Rs512 => "RS512",
            Algorithm::Es256 => "ES256",
            Algorithm::Es384 => "ES384",
            Algorithm::Es512 => "ES512",
            Algorithm::Ps256 => "PS256",
            Algorithm::Ps384 => "PS384",
            Algorithm::Ps512 => "PS512",
        }
    }

    /// Human readable name, e.g. `HMAC SHA-256`.
    #[must_use]
    pub const fn full_name(self) -> &'static str {
        match self {
            Algorithm::Hs256 => "HMAC SHA-256",
            Algorithm::Hs384 => "HMAC SHA-384",
            Algorithm::Hs512 => "HMAC SHA-512",
            Algorithm::Rs256 => "RSA SHA-256",
            Algorithm::Rs384 => "RSA SHA-384",
            Algorithm::Rs512 => "RSA SHA-512",
            Algorithm::Es256 => "ECDSA SHA-256",
            Algorithm::Es384 => "ECDSA SHA-384",
            Algorithm::Es512 => "ECDSA SHA-512",
            Algorithm::Ps256 => "RSA-PSS SHA-256",
            Algorithm::Ps384 => "RSA-PSS SHA-384",
            Algorithm::Ps512 => "RSA-PSS SHA-512",
        }
    }

    /// Family the algorithm belongs to.
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512 => AlgorithmFamily::Hmac,
            Algorithm::Rs256 | Algorithm::Rs384 | Algorithm::Rs512 => AlgorithmFamily::Rsa,
            Algorithm::Es256 | Algorithm::Es384 | Algorithm::Es512 => AlgorithmFamily::Ecdsa,
            Algorithm::Ps256 | Algorithm::Ps384 | Algorithm::Ps512 => AlgorithmFamily::RsaPss,
        }
    }

    /// Curve for ECDSA algorithms, `None` otherwise.
    #[must_use]
    pub const fn curve(self) -> Option<EcCurve> {
        match self {
            Algorithm::Es256 => Some(EcCurve::P256),
            Algorithm::Es384 => Some(EcCurve::P384),
            Algorithm::Es512 => Some(EcCurve::P521),
            _ => None,
        }
    }

    /// Digest output size in bits.
    #[must_use]
    pub const fn hash_bits(self) -> usize {
        match self {
            Algorithm::Hs256 | Algorithm::Rs256 | Algorithm::Es256 | Algorithm::Ps256 => 256,
            Algorithm::Hs384 | Algorithm::Rs384 | Algorithm::Es384 | Algorithm::Ps384 => 384,
            Algorithm::Hs512 | Algorithm::Rs512 | Algorithm::Es512 | Algorithm::Ps512 => 512,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| JwtError::UnsupportedAlgorithm { alg: s.to_string() })
    }
}

impl AlgorithmFamily {
    /// Whether the family uses one shared secret instead of a key pair.
    #[must_use]
    pub const fn is_symmetric(self) -> bool {
        matches!(self, AlgorithmFamily::Hmac)
    }
}

impl EcCurve {
    /// `crv` value used in JSON Web Keys.
    #[must_use]
    pub const fn jwk_name(self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Size in bytes of one coordinate or scalar.
    #[must_use]
    pub const fn field_size(self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    /// Size of a raw `r || s` signature.
    #[must_use]
    pub const fn signature_size(self) -> usize {
        self.field_size() * 2
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwk_name())
    }
}
