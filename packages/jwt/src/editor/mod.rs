//! Live JWT editor
//!
//! [`JwtEditor`] keeps a token, its decoded header and payload, and the key
//! material for every algorithm family consistent while any of them is
//! edited. Edits return a [`PendingEdit`] that does the cryptographic work
//! in the background; awaiting it yields an [`EditOutcome`] to feed back
//! through [`JwtEditor::apply`]. Outcomes from superseded edits are dropped,
//! so the last edit issued always wins regardless of completion order.
//!
//! ```no_run
//! # async fn demo() -> devbelt_jwt::JwtResult<()> {
//! use devbelt_jwt::editor::{EditorConfig, JwtEditor};
//!
//! let mut editor = JwtEditor::new(EditorConfig::default());
//! let pending = editor.edit_payload(r#"{"sub":"42"}"#)?;
//! editor.commit(pending).await;
//! assert!(editor.state().valid_signature);
//! # Ok(())
//! # }
//! ```

pub mod config;
mod materials;
pub mod samples;
mod tasks;

pub use config::{EditorConfig, KeyPairPem};
pub use materials::KeySlot;
pub use tasks::{EditOutcome, PendingEdit};

use crate::{
    algorithms::Algorithm,
    decoder::{self, split_segments},
    error::{JwtError, JwtResult},
    signer::{self, sign_compact},
    types::{
        DecodeResult, DecodeWarning, Header, Payload, SignatureMaterial, TokenStatus,
        VerifyOptions, VerifyResult,
    },
    verifier::verify_compact,
};
use materials::MaterialStore;
use tasks::{OutcomeKind, Sequencer};
use tracing::{debug, error, warn};

/// What the editor currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    /// Token text, exactly as last entered or generated
    pub token: String,
    /// Header of the last token that verified or was signed
    pub header: Header,
    /// Payload of the last token that verified or was signed
    pub payload: Payload,
    /// Active algorithm; selects the key material in use
    pub algorithm: Algorithm,
    /// Whether `token` verifies against the active material
    pub valid_signature: bool,
    /// Display status of `token`
    pub status: TokenStatus,
    /// Decode warnings for `token`
    pub warnings: Vec<DecodeWarning>,
}

/// Header, payload and algorithm that the next re-sign will use.
#[derive(Debug, Clone)]
struct Draft {
    header: Header,
    payload: Payload,
    algorithm: Algorithm,
}

impl From<&EditorState> for Draft {
    fn from(state: &EditorState) -> Self {
        Self {
            header: state.header.clone(),
            payload: state.payload.clone(),
            algorithm: state.algorithm,
        }
    }
}

/// Bidirectional token editor.
pub struct JwtEditor {
    state: EditorState,
    draft: Draft,
    materials: MaterialStore,
    options: VerifyOptions,
    sequencer: Sequencer,
}

impl JwtEditor {
    /// Open the editor on `config.initial_token`, verifying it synchronously.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let materials = MaterialStore::from_config(&config);
        let options = config.verify_options();
        let token = config.initial_token;

        let decoded = decoder::decode(&token);
        let algorithm = decoded
            .header
            .as_ref()
            .and_then(|header| header.algorithm().ok())
            .unwrap_or(Algorithm::Hs256);
        let verified = verify_compact(&token, materials.for_algorithm(algorithm), &options);
        let status = TokenStatus::classify(&decoded, &verified);

        let header = verified
            .verified_header
            .or(decoded.header)
            .unwrap_or_else(|| Header::new(algorithm));
        let payload = verified.verified_payload.unwrap_or(decoded.payload);

        let state = EditorState {
            token,
            header,
            payload,
            algorithm,
            valid_signature: verified.valid_signature,
            status,
            warnings: decoded.warnings,
        };
        debug!(%algorithm, status = status.label(), "editor opened");

        Self {
            draft: Draft::from(&state),
            state,
            materials,
            options,
            sequencer: Sequencer::default(),
        }
    }

    /// Current display state.
    #[must_use]
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Material for the algorithm the next edit will sign with.
    #[must_use]
    pub fn material(&self) -> &SignatureMaterial {
        self.materials.for_algorithm(self.draft.algorithm)
    }

    /// Material remembered for `slot`.
    #[must_use]
    pub fn material_for(&self, slot: KeySlot) -> &SignatureMaterial {
        self.materials.get(slot)
    }

    /// Verification policy in force.
    #[must_use]
    pub fn verify_options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Replace the token text and verify it.
    ///
    /// The material is chosen from the `alg` of the new token's own header.
    pub fn edit_token(&mut self, token: impl Into<String>) -> PendingEdit {
        let token = token.into();
        let seq = self.sequencer.next();
        let decoded = decoder::decode(&token);
        let algorithm = decoded
            .header
            .as_ref()
            .and_then(|header| header.algorithm().ok())
            .unwrap_or(self.draft.algorithm);
        let material = self.materials.for_algorithm(algorithm).clone();
        let options = self.options.clone();
        debug!(seq, %algorithm, "token edit issued");

        PendingEdit::spawn(seq, move || {
            let verified = verify_compact(&token, &material, &options);
            OutcomeKind::Verified {
                token,
                decoded,
                verified,
            }
        })
    }

    /// Replace only the signature segment of the current token.
    pub fn edit_signature_segment(&mut self, signature: &str) -> JwtResult<PendingEdit> {
        let token = match split_segments(&self.state.token) {
            Ok([header, payload, _]) => format!("{header}.{payload}.{signature}"),
            Err(_) => {
                let signing_input = signer::signing_input(&self.draft.header, &self.draft.payload)?;
                format!("{signing_input}.{signature}")
            }
        };
        Ok(self.edit_token(token))
    }

    /// Replace the header with edited JSON and re-sign.
    ///
    /// Text that is not a JSON object is rejected without touching the token.
    pub fn edit_header(&mut self, json: &str) -> JwtResult<PendingEdit> {
        let header = Header::from_json_str(json).inspect_err(|err| {
            warn!(error = %err, "header edit rejected");
        })?;
        if let Ok(algorithm) = header.algorithm() {
            self.draft.algorithm = algorithm;
        }
        self.draft.header = header;
        Ok(self.resign())
    }

    /// Replace the payload with edited JSON and re-sign.
    pub fn edit_payload(&mut self, json: &str) -> JwtResult<PendingEdit> {
        let payload = Payload::from_json_str(json).inspect_err(|err| {
            warn!(error = %err, "payload edit rejected");
        })?;
        self.draft.payload = payload;
        Ok(self.resign())
    }

    /// Replace the material of the active family.
    ///
    /// A displayed token that verifies is re-signed with the new material.
    /// One that does not is re-verified against it instead, so a pasted
    /// token can be checked by supplying its key.
    pub fn edit_material(&mut self, material: SignatureMaterial) -> JwtResult<PendingEdit> {
        self.store_material(material)?;
        if self.state.valid_signature {
            Ok(self.resign())
        } else {
            Ok(self.reverify())
        }
    }

    /// Replace the HMAC secret.
    ///
    /// Follows [`edit_material`](Self::edit_material): re-sign a verified
    /// token, re-verify anything else.
    pub fn edit_secret(&mut self, key: &str, base64_encoded: bool) -> JwtResult<PendingEdit> {
        self.edit_material(SignatureMaterial::Symmetric {
            key: key.to_string(),
            base64_encoded,
        })
    }

    /// Replace the public key of the active family and re-verify the token.
    pub fn edit_public_key(&mut self, text: &str) -> JwtResult<PendingEdit> {
        match self.material().clone() {
            SignatureMaterial::Asymmetric { private_key, .. } => {
                self.store_material(SignatureMaterial::key_pair(text, private_key))?;
                Ok(self.reverify())
            }
            SignatureMaterial::Symmetric { .. } => {
                Err(JwtError::material_mismatch(self.draft.algorithm.as_str()))
            }
        }
    }

    /// Replace the private key of the active family and re-sign.
    pub fn edit_private_key(&mut self, text: &str) -> JwtResult<PendingEdit> {
        match self.material().clone() {
            SignatureMaterial::Asymmetric { public_key, .. } => {
                self.store_material(SignatureMaterial::key_pair(public_key, text))?;
                Ok(self.resign())
            }
            SignatureMaterial::Symmetric { .. } => {
                Err(JwtError::material_mismatch(self.draft.algorithm.as_str()))
            }
        }
    }

    fn store_material(&mut self, material: SignatureMaterial) -> JwtResult<()> {
        let algorithm = self.draft.algorithm;
        if !material.fits(algorithm.family()) {
            warn!(%algorithm, "material edit rejected: wrong kind of material");
            return Err(JwtError::material_mismatch(algorithm.as_str()));
        }
        *self.materials.get_mut(KeySlot::for_algorithm(algorithm)) = material;
        Ok(())
    }

    /// Switch algorithm, keeping every other header member, and re-sign
    /// with the material remembered for the new family.
    pub fn change_algorithm(&mut self, algorithm: Algorithm) -> PendingEdit {
        self.draft.header.set_algorithm(algorithm);
        self.draft.algorithm = algorithm;
        self.resign()
    }

    fn reverify(&mut self) -> PendingEdit {
        let token = self.state.token.clone();
        self.edit_token(token)
    }

    fn resign(&mut self) -> PendingEdit {
        let seq = self.sequencer.next();
        let header = self.draft.header.clone();
        let payload = self.draft.payload.clone();
        let material = self.materials.for_algorithm(self.draft.algorithm).clone();
        let options = self.options.clone();
        debug!(seq, algorithm = %self.draft.algorithm, "re-sign issued");

        PendingEdit::spawn(seq, move || {
            match sign_compact(&header, &payload, &material) {
                Ok(token) => {
                    let decoded = decoder::decode(&token);
                    let verified = verify_compact(&token, &material, &options);
                    OutcomeKind::Signed {
                        token,
                        header,
                        payload,
                        decoded,
                        verified,
                    }
                }
                Err(err) => OutcomeKind::Rejected(err),
            }
        })
    }

    /// Apply a finished edit. Returns `false` if it was superseded and dropped.
    pub fn apply(&mut self, outcome: EditOutcome) -> bool {
        if !self.sequencer.is_current(outcome.seq) {
            debug!(seq = outcome.seq, "discarding stale edit");
            return false;
        }

        match outcome.kind {
            OutcomeKind::Verified {
                token,
                decoded,
                verified,
            } => self.show_verified(token, &decoded, verified),
            OutcomeKind::Signed {
                token,
                header,
                payload,
                decoded,
                verified,
            } => self.show_signed(token, header, payload, &decoded, &verified),
            OutcomeKind::Rejected(err) => {
                warn!(error = %err, "edit rejected, keeping previous token");
                self.draft = Draft::from(&self.state);
            }
        }
        true
    }

    /// Await `pending` and apply it.
    pub async fn commit(&mut self, pending: PendingEdit) -> bool {
        let outcome = pending.await;
        self.apply(outcome)
    }

    fn show_verified(&mut self, token: String, decoded: &DecodeResult, verified: VerifyResult) {
        self.state.token = token;
        self.state.status = TokenStatus::classify(decoded, &verified);
        self.state.warnings = decoded.warnings.clone();
        self.state.valid_signature = verified.valid_signature;

        if let (Some(header), Some(payload)) = (verified.verified_header, verified.verified_payload) {
            if let Ok(algorithm) = header.algorithm() {
                self.state.algorithm = algorithm;
            }
            self.state.header = header;
            self.state.payload = payload;
            self.draft = Draft::from(&self.state);
        } else {
            // Keep the last shown claims; the token's own alg picks the material.
            let named = decoded
                .header
                .as_ref()
                .and_then(|header| header.algorithm().ok());
            if let Some(algorithm) = named {
                self.state.algorithm = algorithm;
            }
            self.draft = Draft::from(&self.state);
            self.draft.header.set_algorithm(self.state.algorithm);
        }
        debug!(status = self.state.status.label(), "token edit applied");
    }

    fn show_signed(
        &mut self,
        token: String,
        header: Header,
        payload: Payload,
        decoded: &DecodeResult,
        verified: &VerifyResult,
    ) {
        if !verified.valid_signature {
            error!(
                algorithm = %self.draft.algorithm,
                "freshly signed token does not verify with its own material"
            );
        }
        self.state = EditorState {
            token,
            header,
            payload,
            algorithm: self.draft.algorithm,
            valid_signature: verified.valid_signature,
            status: TokenStatus::classify(decoded, verified),
            warnings: decoded.warnings.clone(),
        };
        self.draft = Draft::from(&self.state);
        debug!(status = self.state.status.label(), "re-signed token applied");
    }
}
