//! HMAC-SHA2 signing and verification

use crate::{
    algorithms::Algorithm,
    error::{JwtError, JwtResult},
};
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

macro_rules! keyed {
    ($mac:ty, $secret:expr) => {
        <$mac>::new_from_slice($secret).map_err(|_| JwtError::Signing("invalid HMAC key".to_string()))
    };
}

/// Compute the HMAC of `message`.
pub(crate) fn sign(alg: Algorithm, secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    let tag = match alg {
        Algorithm::Hs256 => {
            let mut mac = keyed!(HmacSha256, secret)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Hs384 => {
            let mut mac = keyed!(HmacSha384, secret)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Hs512 => {
            let mut mac = keyed!(HmacSha512, secret)?;
            mac.update(message);
            mac.finalize().into_bytes().to_vec()
        }
        _ => return Err(JwtError::material_mismatch(alg.as_str())),
    };
    Ok(tag)
}

/// Check an HMAC tag in constant time.
pub(crate) fn verify(alg: Algorithm, secret: &[u8], message: &[u8], tag: &[u8]) -> bool {
    match alg {
        Algorithm::Hs256 => keyed!(HmacSha256, secret).is_ok_and(|mut mac| {
            mac.update(message);
            mac.verify_slice(tag).is_ok()
        }),
        Algorithm::Hs384 => keyed!(HmacSha384, secret).is_ok_and(|mut mac| {
            mac.update(message);
            mac.verify_slice(tag).is_ok()
        }),
        Algorithm::Hs512 => keyed!(HmacSha512, secret).is_ok_and(|mut mac| {
            mac.update(message);
            mac.verify_slice(tag).is_ok()
        }),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hs256_matches_rfc_4231_case_2() {
        let tag = sign(Algorithm::Hs256, b"Jefe", b"what do ya want for nothing?").unwrap();
        let hex: String = tag.iter().map(|b| format!("{b:02x}")).collect();
        assert_eq!(
            hex,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn tag_lengths_follow_the_hash() {
        for (alg, len) in [
            (Algorithm::Hs256, 32),
            (Algorithm::Hs384, 48),
            (Algorithm::Hs512, 64),
        ] {
            assert_eq!(sign(alg, b"k", b"m").unwrap().len(), len);
        }
    }

    #[test]
    fn verify_rejects_other_secrets_and_truncated_tags() {
        let tag = sign(Algorithm::Hs384, b"secret", b"message").unwrap();
        assert!(verify(Algorithm::Hs384, b"secret", b"message", &tag));
        assert!(!verify(Algorithm::Hs384, b"other", b"message", &tag));
        assert!(!verify(Algorithm::Hs384, b"secret", b"message", &tag[..47]));
        assert!(!verify(Algorithm::Hs256, b"secret", b"message", &tag));
    }

    #[test]
    fn empty_secret_is_accepted() {
        let tag = sign(Algorithm::Hs256, b"", b"m").unwrap();
        assert!(verify(Algorithm::Hs256, b"", b"m", &tag));
    }
}
