//! # Function-backed subscriber (`Func`) and the no-op (`Discard`).
//!
//! [`Func`] wraps a closure `F: Fn(CancellationToken, EventRef) -> Fut`,
//! producing a fresh future per event. Each invocation owns its own state;
//! shared state goes through an explicit `Arc` inside the closure.
//!
//! ## Example
//! ```rust
//! use eventry::{DispatchError, EventRef, Func, SubscriberRef};
//! use tokio_util::sync::CancellationToken;
//!
//! let sub: SubscriberRef = Func::arc(|_ctx: CancellationToken, ev: EventRef| async move {
//!     println!("handled type={}", ev.event_type());
//!     Ok::<_, DispatchError>(())
//! });
//! # let _ = sub;
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;
use crate::subscribers::Subscriber;

/// Function-backed subscriber.
///
/// Wraps a closure that *creates* a new future per handled event.
#[derive(Debug)]
pub struct Func<F> {
    f: F,
}

impl<F, Fut> Func<F>
where
    F: Fn(CancellationToken, EventRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DispatchError>> + Send,
{
    /// Creates a new function-backed subscriber.
    ///
    /// Prefer [`Func::arc`] when you immediately need a
    /// [`SubscriberRef`](crate::SubscriberRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Creates the subscriber and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Subscriber for Func<F>
where
    F: Fn(CancellationToken, EventRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DispatchError>> + Send,
{
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        (self.f)(ctx, event).await
    }
}

/// The designated no-op subscriber: accepts every event and succeeds.
///
/// Useful as a placeholder registration or a default delivery target.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

#[async_trait]
impl Subscriber for Discard {
    async fn handle(&self, _ctx: CancellationToken, _event: EventRef) -> Result<(), DispatchError> {
        Ok(())
    }
}
