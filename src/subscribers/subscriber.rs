//! # Subscriber and publisher traits.
//!
//! [`Subscriber::handle`] receives the caller's [`CancellationToken`] and a
//! shared [`EventRef`]. The token is created and owned by the caller; the
//! engine propagates it opaquely to whatever it calls and never originates
//! a deadline of its own. A leaf subscriber decides for itself whether to
//! honor cancellation.
//!
//! [`Publisher`] is a subscriber with an explicit [`Publisher::publish`]
//! operation, semantically identical to `handle` but named for call-site
//! clarity at the point where an event originates. Because every publisher
//! is also a subscriber, publishers compose: a registry can be registered
//! inside another registry, a buffer can front either.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;

/// Capability to handle one event, possibly failing.
///
/// Implementations must be cheap to share (`Send + Sync`); delivery
/// strategies hold them behind [`SubscriberRef`] and may invoke them
/// concurrently.
#[async_trait]
pub trait Subscriber: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// The token is the caller's cancellation signal, passed through
    /// unchanged. Returning an error never affects sibling subscribers;
    /// partial progress is always preserved.
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError>;
}

/// A [`Subscriber`] with an explicit origination-point operation.
#[async_trait]
pub trait Publisher: Subscriber {
    /// Publishes an event.
    ///
    /// Semantically identical to [`Subscriber::handle`]; the separate name
    /// marks the place where an event enters the system.
    async fn publish(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        self.handle(ctx, event).await
    }
}

/// Shared handle to a subscriber.
pub type SubscriberRef = Arc<dyn Subscriber>;

/// Shared handle to a publisher.
pub type PublisherRef = Arc<dyn Publisher>;

#[async_trait]
impl<S> Subscriber for Arc<S>
where
    S: Subscriber + ?Sized,
{
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        (**self).handle(ctx, event).await
    }
}

#[async_trait]
impl<P> Publisher for Arc<P>
where
    P: Publisher + ?Sized,
{
    async fn publish(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        (**self).publish(ctx, event).await
    }
}

/// An absent subscriber handles every event as a successful no-op.
#[async_trait]
impl<S> Subscriber for Option<S>
where
    S: Subscriber,
{
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        match self {
            Some(inner) => inner.handle(ctx, event).await,
            None => Ok(()),
        }
    }
}
