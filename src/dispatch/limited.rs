//! # Concurrency-bounded decorator.
//!
//! [`Limited`] wraps one subscriber behind a counting permit pool of fixed
//! capacity. Every call acquires a permit before invoking the wrapped
//! subscriber and releases it afterward, success and failure alike, so the
//! pool never leaks capacity. At most `capacity` invocations of the
//! wrapped subscriber are in flight at any instant, across all callers
//! sharing the instance.
//!
//! The wait for a permit is event-driven, never polled, and is the single
//! place in the engine that observes the caller's cancellation token: if
//! the token fires before a permit frees, the call returns
//! [`DispatchError::Canceled`] and the wrapped subscriber is not invoked.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::error::DispatchError;
use crate::events::EventRef;
use crate::subscribers::{Subscriber, SubscriberRef};

/// Bounds concurrent invocations of one subscriber.
///
/// Share a single `Limited` (behind an `Arc`) everywhere the bound should
/// apply; the permit pool belongs to the instance, not to any caller.
/// Capacity is clamped to a minimum of 1.
///
/// # Example
/// ```rust
/// use eventry::{Discard, Limited};
///
/// let bounded = Limited::new(Discard, 4);
/// assert_eq!(bounded.capacity(), 4);
/// ```
pub struct Limited {
    inner: SubscriberRef,
    permits: Semaphore,
    capacity: usize,
}

impl Limited {
    /// Wraps `inner` behind a permit pool of `capacity` slots.
    #[must_use]
    pub fn new(inner: impl Subscriber, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(inner),
            permits: Semaphore::new(capacity),
            capacity,
        }
    }

    /// The fixed size of the permit pool.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl Subscriber for Limited {
    /// Acquires a permit, then delegates to the wrapped subscriber.
    ///
    /// Blocks until a permit frees or the caller's token fires, whichever
    /// comes first. On cancellation the wrapped subscriber is never
    /// invoked.
    async fn handle(&self, ctx: CancellationToken, event: EventRef) -> Result<(), DispatchError> {
        let permit = tokio::select! {
            acquired = self.permits.acquire() => match acquired {
                Ok(permit) => permit,
                Err(_closed) => return Err(DispatchError::Canceled),
            },
            _ = ctx.cancelled() => return Err(DispatchError::Canceled),
        };

        let result = self.inner.handle(ctx, event).await;
        drop(permit);
        result
    }
}
