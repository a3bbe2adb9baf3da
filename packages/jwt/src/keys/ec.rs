//! ECDSA key types for the three supported curves

use crate::algorithms::EcCurve;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use p256::pkcs8::{DecodePrivateKey, DecodePublicKey};
use std::fmt;

/// ECDSA private key on one of the supported curves.
pub enum EcSigningKey {
    /// P-256 key
    P256(p256::ecdsa::SigningKey),
    /// P-384 key
    P384(p384::ecdsa::SigningKey),
    /// P-521 key
    P521(p521::ecdsa::SigningKey),
}

/// ECDSA public key on one of the supported curves.
pub enum EcVerifyingKey {
    /// P-256 key
    P256(p256::ecdsa::VerifyingKey),
    /// P-384 key
    P384(p384::ecdsa::VerifyingKey),
    /// P-521 key
    P521(p521::ecdsa::VerifyingKey),
}

impl EcSigningKey {
    /// Curve of this key.
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        match self {
            EcSigningKey::P256(_) => EcCurve::P256,
            EcSigningKey::P384(_) => EcCurve::P384,
            EcSigningKey::P521(_) => EcCurve::P521,
        }
    }

    pub(crate) fn from_pkcs8_pem(curve: EcCurve, pem: &str) -> Result<Self, String> {
        match curve {
            EcCurve::P256 => {
                let secret = p256::SecretKey::from_pkcs8_pem(pem).map_err(|e| e.to_string())?;
                Self::from_scalar(curve, &secret.to_bytes())
            }
            EcCurve::P384 => {
                let secret = p384::SecretKey::from_pkcs8_pem(pem).map_err(|e| e.to_string())?;
                Self::from_scalar(curve, &secret.to_bytes())
            }
            EcCurve::P521 => {
                let secret = p521::SecretKey::from_pkcs8_pem(pem).map_err(|e| e.to_string())?;
                Self::from_scalar(curve, &secret.to_bytes())
            }
        }
    }

    /// Build from a big-endian private scalar of exactly the curve's field size.
    pub(crate) fn from_scalar(curve: EcCurve, scalar: &[u8]) -> Result<Self, String> {
        if scalar.len() != curve.field_size() {
            return Err(format!(
                "{curve} private scalar must be {} bytes, got {}",
                curve.field_size(),
                scalar.len()
            ));
        }
        let invalid = |e: p256::ecdsa::Error| format!("invalid {curve} private scalar: {e}");
        match curve {
            EcCurve::P256 => p256::ecdsa::SigningKey::from_slice(scalar)
                .map(EcSigningKey::P256)
                .map_err(invalid),
            EcCurve::P384 => p384::ecdsa::SigningKey::from_slice(scalar)
                .map(EcSigningKey::P384)
                .map_err(invalid),
            EcCurve::P521 => p521::ecdsa::SigningKey::from_slice(scalar)
                .map(EcSigningKey::P521)
                .map_err(invalid),
        }
    }
}

impl EcVerifyingKey {
    /// Curve of this key.
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        match self {
            EcVerifyingKey::P256(_) => EcCurve::P256,
            EcVerifyingKey::P384(_) => EcCurve::P384,
            EcVerifyingKey::P521(_) => EcCurve::P521,
        }
    }

    pub(crate) fn from_spki_pem(curve: EcCurve, pem: &str) -> Result<Self, String> {
        let point = match curve {
            EcCurve::P256 => p256::PublicKey::from_public_key_pem(pem)
                .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec()),
            EcCurve::P384 => p384::PublicKey::from_public_key_pem(pem)
                .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec()),
            EcCurve::P521 => p521::PublicKey::from_public_key_pem(pem)
                .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec()),
        }
        .map_err(|e| e.to_string())?;
        Self::from_sec1(curve, &point)
    }

    pub(crate) fn from_spki_der(curve: EcCurve, der: &[u8]) -> Result<Self, String> {
        let point = match curve {
            EcCurve::P256 => p256::PublicKey::from_public_key_der(der)
                .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec()),
            EcCurve::P384 => p384::PublicKey::from_public_key_der(der)
                .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec()),
            EcCurve::P521 => p521::PublicKey::from_public_key_der(der)
                .map(|pk| pk.to_encoded_point(false).as_bytes().to_vec()),
        }
        .map_err(|e| e.to_string())?;
        Self::from_sec1(curve, &point)
    }

    /// Build from the affine coordinates of a JWK.
    pub(crate) fn from_coordinates(curve: EcCurve, x: &[u8], y: &[u8]) -> Result<Self, String> {
        let size = curve.field_size();
        if x.len() != size || y.len() != size {
            return Err(format!("{curve} coordinates must be {size} bytes each"));
        }
        let mut point = Vec::with_capacity(1 + 2 * size);
        point.push(0x04);
        point.extend_from_slice(x);
        point.extend_from_slice(y);
        Self::from_sec1(curve, &point)
    }

    fn from_sec1(curve: EcCurve, point: &[u8]) -> Result<Self, String> {
        let invalid = |e: p256::ecdsa::Error| format!("invalid {curve} public point: {e}");
        match curve {
            EcCurve::P256 => p256::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(EcVerifyingKey::P256)
                .map_err(invalid),
            EcCurve::P384 => p384::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(EcVerifyingKey::P384)
                .map_err(invalid),
            EcCurve::P521 => p521::ecdsa::VerifyingKey::from_sec1_bytes(point)
                .map(EcVerifyingKey::P521)
                .map_err(invalid),
        }
    }
}

impl fmt::Debug for EcSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcSigningKey({})", self.curve())
    }
}

impl fmt::Debug for EcVerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EcVerifyingKey({})", self.curve())
    }
}
