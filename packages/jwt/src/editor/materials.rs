//! Per-family key material
//!
//! Each family keeps whatever the user last entered for it, so switching
//! HS256 -> RS256 -> HS256 brings the old secret back.

use super::config::EditorConfig;
use crate::{
    algorithms::{Algorithm, AlgorithmFamily, EcCurve},
    types::SignatureMaterial,
};

/// Which stored material an algorithm uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySlot {
    /// Shared secret for `HS*`
    Hmac,
    /// Key pair for `RS*`
    Rsa,
    /// Key pair for `PS*`
    RsaPss,
    /// Key pair for one ECDSA curve
    Ecdsa(EcCurve),
}

impl KeySlot {
    /// Slot used by `alg`.
    #[must_use]
    pub fn for_algorithm(alg: Algorithm) -> Self {
        match (alg.family(), alg.curve()) {
            (AlgorithmFamily::Hmac, _) => KeySlot::Hmac,
            (AlgorithmFamily::Rsa, _) => KeySlot::Rsa,
            (AlgorithmFamily::RsaPss, _) => KeySlot::RsaPss,
            (AlgorithmFamily::Ecdsa, Some(curve)) => KeySlot::Ecdsa(curve),
            (AlgorithmFamily::Ecdsa, None) => KeySlot::Ecdsa(EcCurve::P256),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MaterialStore {
    hmac: SignatureMaterial,
    rsa: SignatureMaterial,
    rsa_pss: SignatureMaterial,
    p256: SignatureMaterial,
    p384: SignatureMaterial,
    p521: SignatureMaterial,
}

impl MaterialStore {
    pub(crate) fn from_config(config: &EditorConfig) -> Self {
        Self {
            hmac: config.secret_material(),
            rsa: config.rsa.to_material(),
            rsa_pss: config.rsa.to_material(),
            p256: config.ec_key_pair(EcCurve::P256).to_material(),
            p384: config.ec_key_pair(EcCurve::P384).to_material(),
            p521: config.ec_key_pair(EcCurve::P521).to_material(),
        }
    }

    pub(crate) fn get(&self, slot: KeySlot) -> &SignatureMaterial {
        match slot {
            KeySlot::Hmac => &self.hmac,
            KeySlot::Rsa => &self.rsa,
            KeySlot::RsaPss => &self.rsa_pss,
            KeySlot::Ecdsa(EcCurve::P256) => &self.p256,
            KeySlot::Ecdsa(EcCurve::P384) => &self.p384,
            KeySlot::Ecdsa(EcCurve::P521) => &self.p521,
        }
    }

    pub(crate) fn get_mut(&mut self, slot: KeySlot) -> &mut SignatureMaterial {
        match slot {
            KeySlot::Hmac => &mut self.hmac,
            KeySlot::Rsa => &mut self.rsa,
            KeySlot::RsaPss => &mut self.rsa_pss,
            KeySlot::Ecdsa(EcCurve::P256) => &mut self.p256,
            KeySlot::Ecdsa(EcCurve::P384) => &mut self.p384,
            KeySlot::Ecdsa(EcCurve::P521) => &mut self.p521,
        }
    }

    pub(crate) fn for_algorithm(&self, alg: Algorithm) -> &SignatureMaterial {
        self.get(KeySlot::for_algorithm(alg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_algorithm_maps_to_material_of_its_kind() {
        let store = MaterialStore::from_config(&EditorConfig::default());
        for alg in Algorithm::ALL {
            assert!(store.for_algorithm(alg).fits(alg.family()), "{alg}");
        }
    }

    #[test]
    fn curves_get_their_own_slots() {
        assert_eq!(KeySlot::for_algorithm(Algorithm::Es384), KeySlot::Ecdsa(EcCurve::P384));
        assert_ne!(
            KeySlot::for_algorithm(Algorithm::Es256),
            KeySlot::for_algorithm(Algorithm::Es512)
        );
        assert_eq!(
            KeySlot::for_algorithm(Algorithm::Hs256),
            KeySlot::for_algorithm(Algorithm::Hs512)
        );
    }

    #[test]
    fn slots_are_independent() {
        let mut store = MaterialStore::from_config(&EditorConfig::default());
        *store.get_mut(KeySlot::Hmac) = SignatureMaterial::secret("s1");
        *store.get_mut(KeySlot::Rsa) = SignatureMaterial::key_pair("pub", "priv");
        assert_eq!(store.get(KeySlot::Hmac), &SignatureMaterial::secret("s1"));
        assert_ne!(store.get(KeySlot::RsaPss), store.get(KeySlot::Rsa));
    }
}
