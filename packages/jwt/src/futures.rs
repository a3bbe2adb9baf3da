//! Concrete Future types for JWT operations.
//!
//! Signing and verification run on tokio's blocking pool and hand their result back
//! over a oneshot channel, so callers await a named type instead of an opaque
//! `impl Future`.

use crate::{
    error::{JwtError, JwtResult},
    types::VerifyResult,
};
use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::oneshot;

/// Future for operations that can fail, such as signing.
pub struct AsyncJwtResult<T> {
    rx: oneshot::Receiver<JwtResult<T>>,
}

impl<T> AsyncJwtResult<T> {
    pub(crate) fn new(rx: oneshot::Receiver<JwtResult<T>>) -> Self {
        Self { rx }
    }
}

impl<T> Future for AsyncJwtResult<T> {
    type Output = JwtResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(JwtError::TaskFailed)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Future for token verification.
///
/// Resolves to an invalid result if the background task is lost.
pub struct VerifyFuture {
    rx: oneshot::Receiver<VerifyResult>,
}

impl VerifyFuture {
    pub(crate) fn new(rx: oneshot::Receiver<VerifyResult>) -> Self {
        Self { rx }
    }
}

impl Future for VerifyFuture {
    type Output = VerifyResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(VerifyResult::invalid(false)),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Run `work` on the blocking pool and return its output through `R`.
pub(crate) fn spawn_with<T, R, F>(work: F, wrap: impl FnOnce(oneshot::Receiver<T>) -> R) -> R
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::task::spawn_blocking(move || {
        let _ = tx.send(work());
    });
    wrap(rx)
}
