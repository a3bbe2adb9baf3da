//! JSON Web Token (JWT) engine for the devbelt toolbox
//!
//! This crate provides:
//! - Lenient decoding of compact tokens with per-segment warnings
//! - Signing and verification for the HS, RS, ES and PS algorithm families
//! - Key resolution from secrets, PEM (PKCS#1, PKCS#8, SPKI), X.509 certificates and JWKs
//! - A live editor that keeps token, header, payload and keys consistent
//!
//! Signing and verification have synchronous cores ([`sign_compact`],
//! [`verify_compact`]) and async wrappers ([`sign`], [`verify`]) that run on
//! tokio's blocking pool.

pub mod algorithms;
pub mod claims;
pub mod codec;
mod crypto;
pub mod decoder;
pub mod editor;
mod error;
pub mod futures;
pub mod keys;
pub mod signer;
mod types;
pub mod verifier;

pub use algorithms::{Algorithm, AlgorithmFamily, EcCurve};
pub use decoder::{decode, is_token};
pub use editor::{EditorConfig, EditorState, JwtEditor};
pub use error::{JwtError, JwtResult};
pub use futures::{AsyncJwtResult, VerifyFuture};
pub use keys::{resolve_key, ResolvedKey};
pub use signer::{sign, sign_compact};
pub use types::*;
pub use verifier::{verify, verify_compact};
