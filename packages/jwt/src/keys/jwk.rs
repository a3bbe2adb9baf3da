//! JSON Web Key import
//!
//! Key-use metadata is stripped before import. For verification the private
//! members are stripped too, so a full private JWK pasted into the public key
//! field still yields its public half.

use super::{ec::EcSigningKey, ec::EcVerifyingKey, ResolvedKey};
use crate::{
    algorithms::{Algorithm, AlgorithmFamily},
    codec,
    types::KeyRole,
};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::Deserialize;
use serde_json::{Map, Value};
use zeroize::Zeroizing;

const METADATA_MEMBERS: [&str; 4] = ["alg", "use", "key_ops", "ext"];
const PRIVATE_MEMBERS: [&str; 7] = ["oth", "d", "p", "q", "dp", "dq", "qi"];

#[derive(Deserialize)]
struct JwkFields {
    kty: String,
    crv: Option<String>,
    n: Option<String>,
    e: Option<String>,
    d: Option<String>,
    p: Option<String>,
    q: Option<String>,
    x: Option<String>,
    y: Option<String>,
}

pub(crate) fn import(alg: Algorithm, input: &str, role: KeyRole) -> Result<ResolvedKey, String> {
    let members = shape(input, role)?;
    let jwk: JwkFields =
        serde_json::from_value(Value::Object(members)).map_err(|e| format!("invalid JWK: {e}"))?;

    match (alg.family(), jwk.kty.as_str()) {
        (AlgorithmFamily::Rsa | AlgorithmFamily::RsaPss, "RSA") => import_rsa(&jwk, role),
        (AlgorithmFamily::Ecdsa, "EC") => import_ec(alg, &jwk, role),
        (_, kty) => Err(format!("JWK of type {kty:?} cannot be used with {alg}")),
    }
}

fn shape(input: &str, role: KeyRole) -> Result<Map<String, Value>, String> {
    let mut members = match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(members)) => members,
        Ok(_) => return Err("JWK must be a JSON object".to_string()),
        Err(e) => return Err(format!("not JSON: {e}")),
    };
    for name in METADATA_MEMBERS {
        members.remove(name);
    }
    match role {
        KeyRole::Signing if !members.contains_key("d") => {
            Err("JWK has no private member \"d\"".to_string())
        }
        KeyRole::Signing => Ok(members),
        KeyRole::Verification => {
            for name in PRIVATE_MEMBERS {
                members.remove(name);
            }
            Ok(members)
        }
    }
}

fn import_rsa(jwk: &JwkFields, role: KeyRole) -> Result<ResolvedKey, String> {
    let n = integer(&jwk.n, "n")?;
    let e = integer(&jwk.e, "e")?;
    match role {
        KeyRole::Verification => RsaPublicKey::new(n, e)
            .map(|key| ResolvedKey::RsaPublic(Box::new(key)))
            .map_err(|e| e.to_string()),
        KeyRole::Signing => {
            let d = integer(&jwk.d, "d")?;
            let p = integer(&jwk.p, "p")?;
            let q = integer(&jwk.q, "q")?;
            RsaPrivateKey::from_components(n, e, d, vec![p, q])
                .map(|key| ResolvedKey::RsaPrivate(Box::new(key)))
                .map_err(|e| e.to_string())
        }
    }
}

fn import_ec(alg: Algorithm, jwk: &JwkFields, role: KeyRole) -> Result<ResolvedKey, String> {
    let curve = alg
        .curve()
        .ok_or_else(|| format!("{alg} is not an ECDSA algorithm"))?;
    match jwk.crv.as_deref() {
        Some(crv) if crv == curve.jwk_name() => {}
        Some(crv) => return Err(format!("JWK curve {crv} does not match {alg} ({curve})")),
        None => return Err("JWK is missing \"crv\"".to_string()),
    }
    match role {
        KeyRole::Verification => {
            let x = bytes(&jwk.x, "x")?;
            let y = bytes(&jwk.y, "y")?;
            EcVerifyingKey::from_coordinates(curve, &x, &y).map(ResolvedKey::EcPublic)
        }
        KeyRole::Signing => {
            let d = Zeroizing::new(bytes(&jwk.d, "d")?);
            EcSigningKey::from_scalar(curve, &d).map(ResolvedKey::EcPrivate)
        }
    }
}

fn bytes(member: &Option<String>, name: &str) -> Result<Vec<u8>, String> {
    let text = member
        .as_deref()
        .ok_or_else(|| format!("JWK is missing {name:?}"))?;
    codec::decode(text).map_err(|_| format!("JWK member {name:?} is not base64url"))
}

fn integer(member: &Option<String>, name: &str) -> Result<BigUint, String> {
    bytes(member, name).map(|b| BigUint::from_bytes_be(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shape_strips_metadata_and_private_members() {
        let input = json!({
            "kty": "RSA", "alg": "RS256", "use": "sig", "key_ops": ["verify"], "ext": true,
            "n": "AQAB", "e": "AQAB", "d": "AQ", "p": "AQ", "q": "AQ", "dp": "AQ", "dq": "AQ", "qi": "AQ"
        })
        .to_string();

        let public = shape(&input, KeyRole::Verification).unwrap();
        let mut names: Vec<&str> = public.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["e", "kty", "n"]);

        let private = shape(&input, KeyRole::Signing).unwrap();
        assert!(private.contains_key("d"));
        assert!(!private.contains_key("alg"));
    }

    #[test]
    fn signing_requires_private_member() {
        let input = json!({"kty": "EC", "crv": "P-256", "x": "AA", "y": "AA"}).to_string();
        assert!(shape(&input, KeyRole::Signing).is_err());
    }

    #[test]
    fn rejects_non_objects_and_wrong_key_types() {
        assert!(import(Algorithm::Rs256, "[1]", KeyRole::Verification).is_err());
        assert!(import(Algorithm::Rs256, "-----BEGIN", KeyRole::Verification).is_err());

        let ec = json!({"kty": "EC", "crv": "P-256", "x": "AA", "y": "AA"}).to_string();
        let err = import(Algorithm::Rs256, &ec, KeyRole::Verification).unwrap_err();
        assert!(err.contains("cannot be used with RS256"));
    }

    #[test]
    fn curve_must_match_algorithm() {
        let jwk = json!({"kty": "EC", "crv": "P-384", "x": "AA", "y": "AA"}).to_string();
        let err = import(Algorithm::Es256, &jwk, KeyRole::Verification).unwrap_err();
        assert!(err.contains("P-384"));
    }
}
