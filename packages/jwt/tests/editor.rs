//! Editor state machine behaviour

use devbelt_common::logging;
use devbelt_jwt::{
    editor::{samples, KeySlot},
    Algorithm, DecodeWarning, EditorConfig, Header, JwtEditor, Payload, SignatureMaterial,
    TokenStatus,
};
use serde_json::json;

fn editor() -> JwtEditor {
    logging::init_test();
    JwtEditor::new(EditorConfig::default())
}

#[tokio::test]
async fn test_family_switch_restores_each_familys_material() {
    let mut editor = editor();

    let pending = editor.edit_secret("s1", false).unwrap();
    assert!(editor.commit(pending).await);
    assert!(editor.state().valid_signature);

    let pending = editor.change_algorithm(Algorithm::Rs256);
    assert!(editor.commit(pending).await);
    assert_eq!(editor.state().algorithm, Algorithm::Rs256);
    assert!(editor.state().valid_signature);
    assert_eq!(
        editor.material(),
        &SignatureMaterial::key_pair(samples::RSA_PUBLIC_KEY, samples::RSA_PRIVATE_KEY)
    );

    let other_private = include_str!("fixtures/rsa_other_private.pem");
    let other_public = include_str!("fixtures/rsa_other_public.pem");
    let pending = editor.edit_private_key(other_private).unwrap();
    assert!(editor.commit(pending).await);
    let pending = editor.edit_public_key(other_public).unwrap();
    assert!(editor.commit(pending).await);
    assert!(editor.state().valid_signature);

    let pending = editor.change_algorithm(Algorithm::Hs256);
    assert!(editor.commit(pending).await);
    assert_eq!(editor.material(), &SignatureMaterial::secret("s1"));
    assert!(editor.state().valid_signature);

    assert_eq!(
        editor.material_for(KeySlot::Rsa),
        &SignatureMaterial::key_pair(other_public, other_private)
    );
}

#[tokio::test]
async fn test_change_algorithm_keeps_other_header_members() {
    let mut editor = editor();
    let pending = editor
        .edit_header(r#"{"alg":"HS256","typ":"JWT","kid":"key-1"}"#)
        .unwrap();
    assert!(editor.commit(pending).await);

    let pending = editor.change_algorithm(Algorithm::Es384);
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.valid_signature);
    assert_eq!(state.algorithm, Algorithm::Es384);
    assert_eq!(
        serde_json::to_value(&state.header).unwrap(),
        json!({"alg": "ES384", "typ": "JWT", "kid": "key-1"})
    );
}

#[tokio::test]
async fn test_every_algorithm_resigns_valid_from_defaults() {
    let mut editor = editor();
    for alg in Algorithm::ALL {
        let pending = editor.change_algorithm(alg);
        assert!(editor.commit(pending).await);
        assert!(editor.state().valid_signature, "{alg}");
        assert_eq!(editor.state().status, TokenStatus::Verified, "{alg}");
    }
}

#[tokio::test]
async fn test_payload_edit_resigns() {
    let mut editor = editor();
    let pending = editor.edit_payload(r#"{"sub":"42","admin":true}"#).unwrap();
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.valid_signature);
    assert_ne!(state.token, samples::DEFAULT_TOKEN);
    assert_eq!(state.payload, Payload::Json(json!({"sub": "42", "admin": true})));
}

#[tokio::test]
async fn test_bad_token_keeps_last_good_claims() {
    let mut editor = editor();
    let before = editor.state().clone();

    let pending = editor.edit_token("not.a.jwt!!!");
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert_eq!(state.token, "not.a.jwt!!!");
    assert!(!state.valid_signature);
    assert_eq!(state.status, TokenStatus::Malformed);
    assert_eq!(state.header, before.header);
    assert_eq!(state.payload, before.payload);
}

#[tokio::test]
async fn test_forged_signature_is_flagged_invalid() {
    let mut editor = editor();
    let pending = editor.edit_signature_segment("AAAA").unwrap();
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.token.ends_with(".AAAA"));
    assert!(!state.valid_signature);
    assert_eq!(state.status, TokenStatus::InvalidSignature);

    let original = samples::DEFAULT_TOKEN.rsplit('.').next().unwrap();
    let pending = editor.edit_signature_segment(original).unwrap();
    assert!(editor.commit(pending).await);
    assert!(editor.state().valid_signature);
}

#[tokio::test]
async fn test_pasted_token_of_other_family_uses_that_familys_keys() {
    let mut editor = editor();
    let header = Header::new(Algorithm::Rs384);
    let token = devbelt_jwt::sign_compact(
        &header,
        &Payload::Json(json!({"iss": "elsewhere"})),
        &SignatureMaterial::key_pair(samples::RSA_PUBLIC_KEY, samples::RSA_PRIVATE_KEY),
    )
    .unwrap();

    let pending = editor.edit_token(token.clone());
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.valid_signature);
    assert_eq!(state.algorithm, Algorithm::Rs384);
    assert_eq!(state.header, header);
    assert_eq!(state.token, token);
}

#[tokio::test]
async fn test_token_with_non_object_payload_shows_warning() {
    let mut editor = editor();
    let token = devbelt_jwt::sign_compact(
        &Header::new(Algorithm::Hs256),
        &Payload::Raw("hello".to_string()),
        &SignatureMaterial::secret(samples::DEFAULT_SECRET),
    )
    .unwrap();

    let pending = editor.edit_token(token);
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.valid_signature);
    assert_eq!(state.payload, Payload::Raw("hello".to_string()));
    assert_eq!(state.warnings, vec![DecodeWarning::PayloadInvalidJson]);
}

#[tokio::test]
async fn test_last_issued_edit_wins() {
    let mut editor = editor();
    let slow = editor.change_algorithm(Algorithm::Ps512);
    let fast = editor.edit_token(samples::DEFAULT_TOKEN);
    let fast_seq = fast.seq();

    let fast_outcome = fast.await;
    assert_eq!(fast_outcome.seq(), fast_seq);
    assert!(editor.apply(fast_outcome));
    assert!(!editor.commit(slow).await);

    let state = editor.state();
    assert_eq!(state.token, samples::DEFAULT_TOKEN);
    assert_eq!(state.algorithm, Algorithm::Hs256);
    assert!(state.valid_signature);
}

#[tokio::test]
async fn test_pinned_algorithms_from_config() {
    logging::init_test();
    let config = EditorConfig::from_json_str(r#"{"pinned_algorithms":["RS256"]}"#).unwrap();
    let mut editor = JwtEditor::new(config);
    assert!(!editor.state().valid_signature);
    assert_eq!(editor.state().status, TokenStatus::InvalidSignature);

    let pending = editor.change_algorithm(Algorithm::Rs256);
    assert!(editor.commit(pending).await);
    assert!(editor.state().valid_signature);
}

#[tokio::test]
async fn test_base64_secret_edit() {
    let mut editor = editor();
    let pending = editor
        .edit_secret("eW91ci0yNTYtYml0LXNlY3JldA==", true)
        .unwrap();
    assert!(editor.commit(pending).await);
    assert_eq!(editor.state().token, samples::DEFAULT_TOKEN);
    assert!(editor.state().valid_signature);
}

#[tokio::test]
async fn test_pasted_token_verifies_once_its_public_key_is_entered() {
    let mut editor = editor();
    let other_private = include_str!("fixtures/rsa_other_private.pem");
    let other_public = include_str!("fixtures/rsa_other_public.pem");
    let payload = Payload::Json(json!({"sub": "someone-else"}));
    let token = devbelt_jwt::sign_compact(
        &Header::new(Algorithm::Rs256),
        &payload,
        &SignatureMaterial::key_pair(other_public, other_private),
    )
    .unwrap();

    let pending = editor.edit_token(token.clone());
    assert!(editor.commit(pending).await);
    assert_eq!(editor.state().algorithm, Algorithm::Rs256);
    assert_eq!(editor.state().status, TokenStatus::InvalidSignature);
    assert!(!editor.state().valid_signature);

    let pending = editor.edit_public_key(other_public).unwrap();
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.valid_signature);
    assert_eq!(state.status, TokenStatus::Verified);
    assert_eq!(state.token, token);
    assert_eq!(state.payload, payload);
}

#[tokio::test]
async fn test_pasted_hmac_token_verifies_once_its_secret_is_entered() {
    let mut editor = editor();
    let token = devbelt_jwt::sign_compact(
        &Header::new(Algorithm::Hs512),
        &Payload::Json(json!({"sub": "42"})),
        &SignatureMaterial::secret("pasted-secret"),
    )
    .unwrap();

    let pending = editor.edit_token(token.clone());
    assert!(editor.commit(pending).await);
    assert!(!editor.state().valid_signature);

    let pending = editor.edit_secret("pasted-secret", false).unwrap();
    assert!(editor.commit(pending).await);
    assert!(editor.state().valid_signature);
    assert_eq!(editor.state().token, token);
}

#[tokio::test]
async fn test_oversized_integer_claim_survives_resign() {
    let mut editor = editor();
    let pending = editor
        .edit_payload(r#"{"id":123456789012345678901234567890}"#)
        .unwrap();
    assert!(editor.commit(pending).await);

    let state = editor.state();
    assert!(state.valid_signature);
    let payload_segment = state.token.split('.').nth(1).unwrap();
    let text = String::from_utf8(devbelt_jwt::codec::decode(payload_segment).unwrap()).unwrap();
    assert_eq!(text, r#"{"id":123456789012345678901234567890}"#);
}
