//! Sequenced background edits
//!
//! Every edit gets a number when it is issued. Only the outcome carrying the
//! newest number may change what the editor shows; anything older that
//! finishes late is dropped.

use crate::{
    error::JwtError,
    types::{DecodeResult, Header, Payload, VerifyResult},
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// What a finished edit produced.
#[derive(Debug)]
pub(crate) enum OutcomeKind {
    /// A token typed or pasted by the user, decoded and verified
    Verified {
        token: String,
        decoded: DecodeResult,
        verified: VerifyResult,
    },
    /// A token freshly signed from the editor's header and payload
    Signed {
        token: String,
        header: Header,
        payload: Payload,
        decoded: DecodeResult,
        verified: VerifyResult,
    },
    /// The edit could not be carried out
    Rejected(JwtError),
}

/// Result of a background edit, to be handed to [`JwtEditor::apply`](super::JwtEditor::apply).
#[derive(Debug)]
pub struct EditOutcome {
    pub(crate) seq: u64,
    pub(crate) kind: OutcomeKind,
}

impl EditOutcome {
    /// Sequence number of the edit that produced this outcome.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// The error, if the edit was rejected.
    #[must_use]
    pub fn error(&self) -> Option<&JwtError> {
        match &self.kind {
            OutcomeKind::Rejected(err) => Some(err),
            _ => None,
        }
    }
}

/// An edit running in the background.
pub struct PendingEdit {
    seq: u64,
    rx: oneshot::Receiver<OutcomeKind>,
}

impl PendingEdit {
    pub(crate) fn spawn<F>(seq: u64, work: F) -> Self
    where
        F: FnOnce() -> OutcomeKind + Send + 'static,
    {
        crate::futures::spawn_with(work, |rx| Self { seq, rx })
    }

    /// Sequence number assigned when the edit was issued.
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Future for PendingEdit {
    type Output = EditOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let seq = self.seq;
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(kind)) => Poll::Ready(EditOutcome { seq, kind }),
            Poll::Ready(Err(_)) => Poll::Ready(EditOutcome {
                seq,
                kind: OutcomeKind::Rejected(JwtError::TaskFailed),
            }),
            Poll::Pending => Poll::Pending,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Sequencer {
    latest: u64,
}

impl Sequencer {
    pub(crate) fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub(crate) fn is_current(&self, seq: u64) -> bool {
        seq == self.latest
    }
}
