//! Async result types for hashing and verification
//!
//! Work runs on tokio's blocking pool and reports back over a oneshot
//! channel. Awaiting the result is the only suspension point.

use crate::{Result, ScryptError};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Pending outcome of a scrypt operation
#[must_use = "futures do nothing unless awaited"]
pub struct AsyncScryptResult<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

/// Pending outcome with a user-defined result handler
#[must_use = "futures do nothing unless awaited"]
pub struct AsyncScryptResultWithHandler<T, F> {
    receiver: oneshot::Receiver<Result<T>>,
    handler: Option<F>,
}

impl<T: Send + 'static> AsyncScryptResult<T> {
    /// Run `work` on the blocking pool and resolve with its output
    pub(crate) fn spawn_blocking<W>(work: W) -> Self
    where
        W: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            let _ = tx.send(work());
        });
        Self { receiver: rx }
    }

    /// Create an `AsyncScryptResult` that's already completed
    pub fn ready(result: Result<T>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// Create an `AsyncScryptResult` that yields an error
    pub fn error(error: ScryptError) -> Self {
        Self::ready(Err(error))
    }

    /// Attach a handler that turns the result into a plain value
    pub fn on_result<F, U>(self, handler: F) -> AsyncScryptResultWithHandler<T, F>
    where
        F: FnOnce(Result<T>) -> U,
    {
        AsyncScryptResultWithHandler {
            receiver: self.receiver,
            handler: Some(handler),
        }
    }
}

fn dropped<T>() -> Result<T> {
    Err(ScryptError::internal("scrypt worker task dropped"))
}

impl<T> Future for AsyncScryptResult<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(dropped()),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, F, U> Future for AsyncScryptResultWithHandler<T, F>
where
    F: FnOnce(Result<T>) -> U + Unpin,
{
    type Output = U;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        // Already completed
        if this.handler.is_none() {
            return Poll::Pending;
        }

        let result = match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(_)) => dropped(),
            Poll::Pending => return Poll::Pending,
        };
        match this.handler.take() {
            Some(handler) => Poll::Ready(handler(result)),
            None => Poll::Pending,
        }
    }
}
